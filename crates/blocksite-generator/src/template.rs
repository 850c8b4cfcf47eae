//! Page layouts.
//!
//! Layouts are `{{ }}` string templates (see [`blocksite_core::template`]).
//! The built-in set can be replaced per layout by dropping a file named
//! `<templates_dir>/layouts/<name>.html`.

use std::{collections::HashMap, fs, path::Path};

use blocksite_core::{Template, TemplateContext, TemplateError};
use tracing::debug;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Directory of layout overrides, relative to the templates dir.
pub const LAYOUTS_DIR: &str = "layouts";

/// Names of the built-in layouts.
pub const LAYOUT_NAMES: &[&str] = &["base", "page", "not_found", "error", "redirect"];

/// Registry of layouts.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with default templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    /// Registry with defaults, overridden by layouts found in `templates_dir`.
    pub fn with_overrides(templates_dir: &Path) -> Result<Self> {
        let mut registry = Self::new();
        let dir = templates_dir.join(LAYOUTS_DIR);

        for name in LAYOUT_NAMES {
            let path = dir.join(format!("{name}.html"));
            if let Ok(content) = fs::read_to_string(&path) {
                debug!(layout = name, path = %path.display(), "using layout override");
                registry.register(Template::parse(*name, content)?);
            }
        }

        Ok(registry)
    }

    fn register_defaults(&mut self) {
        self.register(Template::new("base", DEFAULT_BASE_TEMPLATE));
        self.register(Template::new("page", DEFAULT_PAGE_TEMPLATE));
        self.register(Template::new("not_found", DEFAULT_NOT_FOUND_TEMPLATE));
        self.register(Template::new("error", DEFAULT_ERROR_TEMPLATE));
        self.register(Template::new("redirect", DEFAULT_REDIRECT_TEMPLATE));
    }

    /// Register a template.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name().to_string(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Default base HTML template.
pub const DEFAULT_BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <meta name="description" content="{{ description? }}">
    <link rel="canonical" href="{{ canonical_url }}">
    {{ alternates? }}
    <link rel="stylesheet" href="/styles.css">
</head>
<body>
    <header class="mx-auto px-4 max-w-screen-lg">
        <nav class="flex justify-between py-4">
            <a href="{{ home_url }}" class="font-bold">{{ site_title }}</a>
            {{ guide_link? }}
        </nav>
    </header>
    <main class="mx-auto px-4 max-w-screen-lg">
        {{ content }}
    </main>
</body>
</html>"##;

/// Default page template.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<article class="page" data-record="{{ record_id }}">
    {{ blocks }}
</article>"#;

/// Default not-found template.
pub const DEFAULT_NOT_FOUND_TEMPLATE: &str = r#"<section class="not-found text-center py-16">
    <h1 class="text-4xl font-extrabold">{{ heading }}</h1>
    <p class="leading-7">{{ message }}</p>
    <a href="{{ home_url }}">{{ cta }}</a>
</section>"#;

/// Default error template.
pub const DEFAULT_ERROR_TEMPLATE: &str = r#"<section class="error text-center py-16">
    <h1 class="text-4xl font-extrabold">{{ heading }}</h1>
    <p class="leading-7">{{ message }}</p>
    <a href="{{ retry_url }}">{{ retry }}</a>
</section>"#;

/// Default redirect template.
pub const DEFAULT_REDIRECT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta http-equiv="refresh" content="0; url={{ redirect_url }}">
    <link rel="canonical" href="{{ redirect_url }}">
    <title>Redirecting...</title>
</head>
<body>
    <p>Redirecting to <a href="{{ redirect_url }}">{{ redirect_url }}</a></p>
</body>
</html>"#;
