//! Convention-based renderer loading.
//!
//! The renderer for key `K` lives in `<templates_dir>/blocks/K/K.html`. When
//! no such template exists the built-in renderers are tried.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use blocksite_core::{
    ContentBlock, Template, TemplateContext,
    content::{ID_KEY, TYPE_TAG_KEY},
    template::escape_html,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    components,
    error::LoadError,
    key::RendererKey,
    registry::{BlockRenderer, SharedRenderer},
};

/// Directory holding block templates, relative to the templates dir.
pub const BLOCKS_DIR: &str = "blocks";

/// Strategy producing renderers for keys missing from every registry.
pub trait BlockLoader: Send + Sync {
    /// Load the renderer for `key`.
    fn load(&self, key: &RendererKey) -> Result<SharedRenderer, LoadError>;

    /// Where the renderer for `key` is expected, for diagnostics.
    fn location(&self, key: &RendererKey) -> String;
}

/// Loads block templates by naming convention, then built-in renderers.
#[derive(Debug, Clone, Default)]
pub struct ConventionLoader {
    templates_dir: Option<PathBuf>,
}

impl ConventionLoader {
    /// Loader that only knows the built-in renderers.
    #[must_use]
    pub fn builtin_only() -> Self {
        Self::default()
    }

    /// Loader reading block templates below `templates_dir`.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: Some(templates_dir.into()),
        }
    }

    /// Relative path of the template for a key.
    pub fn relative_path(key: &RendererKey) -> PathBuf {
        Path::new(BLOCKS_DIR)
            .join(key.as_str())
            .join(format!("{key}.html"))
    }

    fn template_path(&self, key: &RendererKey) -> Option<PathBuf> {
        let dir = self.templates_dir.as_ref()?;
        is_safe_key(key).then(|| dir.join(Self::relative_path(key)))
    }

    fn load_template(&self, key: &RendererKey, path: &Path) -> Result<SharedRenderer, LoadError> {
        let location = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            location: location.clone(),
            source,
        })?;

        if source.trim().is_empty() {
            return Err(LoadError::unusable(key, location, "template is empty"));
        }

        let template = Template::parse(key.as_str(), source)
            .map_err(|e| LoadError::unusable(key, &location, e.to_string()))?;

        debug!(key = %key, path = %location, "loaded block template");
        Ok(Arc::new(TemplateRenderer::new(template)))
    }
}

impl BlockLoader for ConventionLoader {
    fn load(&self, key: &RendererKey) -> Result<SharedRenderer, LoadError> {
        if let Some(path) = self.template_path(key)
            && path.is_file()
        {
            return self.load_template(key, &path);
        }

        if let Some(renderer) = components::builtin(key.as_str()) {
            debug!(key = %key, "using built-in block renderer");
            return Ok(renderer);
        }

        Err(LoadError::not_found(key, self.location(key)))
    }

    fn location(&self, key: &RendererKey) -> String {
        match &self.templates_dir {
            Some(dir) => dir.join(Self::relative_path(key)).display().to_string(),
            None => Self::relative_path(key).display().to_string(),
        }
    }
}

fn is_safe_key(key: &RendererKey) -> bool {
    let key = key.as_str();
    !key.is_empty() && !key.contains(['/', '\\']) && !key.starts_with('.')
}

/// Renders a block through a `{{ }}` template.
///
/// The context holds `id`, `__typename` and every field of the block. String
/// fields are HTML-escaped; other values are inserted as escaped JSON.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template: Template,
}

impl TemplateRenderer {
    pub fn new(template: Template) -> Self {
        Self { template }
    }

    /// Template context for a block.
    pub fn context(block: &ContentBlock) -> TemplateContext {
        let mut ctx = TemplateContext::new()
            .with_var(ID_KEY, escape_html(&block.id))
            .with_var(TYPE_TAG_KEY, escape_html(&block.type_tag));

        for (name, value) in &block.fields {
            let text = match value {
                Value::String(s) => escape_html(s),
                Value::Null => String::new(),
                other => escape_html(&other.to_string()),
            };
            ctx.insert(name.clone(), text);
        }

        ctx
    }
}

impl BlockRenderer for TemplateRenderer {
    fn render(&self, block: &ContentBlock) -> String {
        match self.template.render(&Self::context(block)) {
            Ok(html) => html,
            Err(e) => {
                warn!(
                    template = self.template.name(),
                    block_id = %block.id,
                    error = %e,
                    "block template failed to render"
                );
                String::new()
            }
        }
    }
}
