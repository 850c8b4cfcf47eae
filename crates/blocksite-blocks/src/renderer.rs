//! The block list renderer.

use std::{collections::HashSet, path::PathBuf, sync::Arc};

use blocksite_core::ContentBlock;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    cache::LazyRendererCache,
    error::RenderError,
    key::{RendererKey, derive_key},
    loader::{BlockLoader, ConventionLoader},
    registry::{ComponentRegistry, NoopRenderer, SharedRenderer, merge},
    report::{ErrorReporter, TracingReporter},
};

/// Output of one rendered block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBlock {
    /// The block `id`, stable across renders.
    pub key: String,

    /// The block's CMS type tag.
    pub type_tag: String,

    /// Rendered HTML; empty when the renderer could not be resolved.
    pub html: String,
}

impl RenderedBlock {
    /// Whether the block produced no output.
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Whether a block carries only `id` and `__typename`.
///
/// Such blocks come from CMS queries that did not fetch the block's fragment
/// and are skipped. A field present with a `null` value still counts.
pub fn is_placeholder(block: &ContentBlock) -> bool {
    block.fields.is_empty()
}

/// Renders ordered block lists.
///
/// Cheap to clone; clones share the default registry, the lazy cache, the
/// loader and the reporter.
#[derive(Clone)]
pub struct ContentRenderer {
    defaults: Arc<ComponentRegistry>,
    cache: Arc<LazyRendererCache>,
    loader: Arc<dyn BlockLoader>,
    reporter: Arc<dyn ErrorReporter>,
}

impl ContentRenderer {
    pub fn builder() -> ContentRendererBuilder {
        ContentRendererBuilder::default()
    }

    /// The default registry.
    pub fn defaults(&self) -> &ComponentRegistry {
        &self.defaults
    }

    /// The lazy renderer cache.
    pub fn cache(&self) -> &LazyRendererCache {
        &self.cache
    }

    /// Resolve the renderer for `key`.
    ///
    /// Registry hits are returned directly. Otherwise the lazy cache is
    /// consulted, then the loader; a successful load is cached.
    pub fn resolve(
        &self,
        key: &RendererKey,
        effective: &ComponentRegistry,
    ) -> Result<SharedRenderer, RenderError> {
        if let Some(renderer) = effective.get(key.as_str()) {
            trace!(key = %key, "resolved from registry");
            return Ok(Arc::clone(renderer));
        }

        if let Some(renderer) = self.cache.get(key) {
            trace!(key = %key, "resolved from lazy cache");
            return Ok(renderer);
        }

        match self.loader.load(key) {
            Ok(renderer) => {
                debug!(key = %key, "loaded renderer");
                Ok(self.cache.get_or_insert(key.clone(), renderer))
            }
            Err(source) => Err(RenderError::Unresolved {
                key: key.clone(),
                location: self.loader.location(key),
                source,
            }),
        }
    }

    /// Render `blocks` in order, with `overrides` taking precedence over the
    /// default registry.
    ///
    /// Placeholder blocks produce no output. A block whose renderer cannot be
    /// resolved produces an empty entry, and its key is reported once per call.
    pub fn render_all(
        &self,
        blocks: &[ContentBlock],
        overrides: Option<&ComponentRegistry>,
    ) -> Vec<RenderedBlock> {
        let effective = merge(&self.defaults, overrides);
        let mut reported: HashSet<RendererKey> = HashSet::new();
        let mut output = Vec::with_capacity(blocks.len());

        for block in blocks {
            if is_placeholder(block) {
                trace!(id = %block.id, type_tag = %block.type_tag, "skipping placeholder block");
                continue;
            }

            let key = derive_key(&block.type_tag);
            let renderer = match self.resolve(&key, &effective) {
                Ok(renderer) => renderer,
                Err(err) => {
                    if reported.insert(err.key().clone()) {
                        self.reporter.report(&err.diagnostic());
                    }
                    Arc::new(NoopRenderer)
                }
            };

            output.push(RenderedBlock {
                key: block.id.clone(),
                type_tag: block.type_tag.clone(),
                html: renderer.render(block),
            });
        }

        output
    }

    /// Render `blocks` and concatenate the HTML.
    pub fn render_html(
        &self,
        blocks: &[ContentBlock],
        overrides: Option<&ComponentRegistry>,
    ) -> String {
        self.render_all(blocks, overrides)
            .into_iter()
            .map(|block| block.html)
            .collect()
    }
}

impl std::fmt::Debug for ContentRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRenderer")
            .field("defaults", &self.defaults)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ContentRenderer`].
#[derive(Default)]
pub struct ContentRendererBuilder {
    defaults: Option<ComponentRegistry>,
    cache: Option<Arc<LazyRendererCache>>,
    loader: Option<Arc<dyn BlockLoader>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    templates_dir: Option<PathBuf>,
}

impl ContentRendererBuilder {
    /// Set the default registry.
    pub fn defaults(mut self, defaults: ComponentRegistry) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Share an existing lazy cache.
    pub fn cache(mut self, cache: Arc<LazyRendererCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use a custom loader instead of [`ConventionLoader`].
    pub fn loader(mut self, loader: Arc<dyn BlockLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Set the diagnostics sink. Defaults to [`TracingReporter`].
    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Templates directory for the default [`ConventionLoader`].
    pub fn templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> ContentRenderer {
        let loader = self.loader.unwrap_or_else(|| match self.templates_dir {
            Some(dir) => Arc::new(ConventionLoader::new(dir)),
            None => Arc::new(ConventionLoader::builtin_only()),
        });

        ContentRenderer {
            defaults: Arc::new(self.defaults.unwrap_or_default()),
            cache: self.cache.unwrap_or_default(),
            loader,
            reporter: self.reporter.unwrap_or_else(|| Arc::new(TracingReporter)),
        }
    }
}
