//! HTML generation for localized pages and error pages.

use std::path::{Path, PathBuf};

use blocksite_core::{
    Config, LocalizedPage, Messages, TemplateContext, TemplateError, template::escape_html, url,
};
use thiserror::Error;
use tracing::debug;

use crate::template::TemplateRegistry;

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    config: Config,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the built-in layouts.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            templates: TemplateRegistry::new(),
            config,
        }
    }

    /// Create a generator with custom layouts.
    #[must_use]
    pub fn with_templates(config: Config, templates: TemplateRegistry) -> Self {
        Self { templates, config }
    }

    /// Generate HTML for a page whose blocks are already rendered.
    ///
    /// `alternates` are `(locale, slug)` pairs of the page's translations,
    /// the page itself included.
    pub fn generate_page(
        &self,
        page: &LocalizedPage,
        blocks_html: &str,
        alternates: &[(&str, &str)],
        messages: &Messages,
    ) -> Result<String> {
        debug!(locale = %page.locale, slug = %page.slug, "generating HTML for page");

        let inner_ctx = TemplateContext::new()
            .with_var("record_id", escape_html(&page.record_id))
            .with_var("blocks", blocks_html);
        let inner_html = self.templates.render("page", &inner_ctx)?;

        let title = match &page.title {
            Some(title) => format!("{title} | {}", self.config.site.title),
            None => self.config.site.title.clone(),
        };
        let description = page
            .description
            .as_deref()
            .or(self.config.site.description.as_deref());

        let mut ctx = self
            .base_context(&page.locale, &title, &inner_html, messages)
            .with_var(
                "canonical_url",
                self.config.localized_url(&page.slug, &page.locale),
            );

        if let Some(description) = description {
            ctx.insert("description", escape_html(description));
        }

        if !alternates.is_empty() {
            let links = alternates
                .iter()
                .map(|(locale, slug)| {
                    format!(
                        r#"<link rel="alternate" hreflang="{locale}" href="{}" />"#,
                        self.config.localized_url(slug, locale)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n    ");
            ctx.insert("alternates", links);
        }

        Ok(self.templates.render("base", &ctx)?)
    }

    /// Generate the not-found page.
    ///
    /// `locale` is `None` for the root page served for unknown locales.
    pub fn generate_not_found(&self, locale: Option<&str>, messages: &Messages) -> Result<String> {
        let home = self.home_path(locale);
        let ctx = TemplateContext::new()
            .with_var("heading", escape_html(messages.t("NotFoundPage.title")))
            .with_var("message", escape_html(messages.t("NotFoundPage.message")))
            .with_var("cta", escape_html(messages.t("NotFoundPage.cta")))
            .with_var("home_url", &home);
        let inner_html = self.templates.render("not_found", &ctx)?;

        let title = format!("{} | {}", messages.t("NotFoundPage.title"), self.config.site.title);
        let ctx = self
            .base_context(messages.locale(), &title, &inner_html, messages)
            .with_var("home_url", &home)
            .with_var("canonical_url", self.config.url_for(&home));
        Ok(self.templates.render("base", &ctx)?)
    }

    /// Generate the error page of a locale.
    pub fn generate_error(&self, locale: &str, messages: &Messages) -> Result<String> {
        let home = self.home_path(Some(locale));
        let ctx = TemplateContext::new()
            .with_var("heading", escape_html(messages.t("Error.title")))
            .with_var("message", escape_html(messages.t("Error.message")))
            .with_var("retry", escape_html(messages.t("Error.retry")))
            .with_var("retry_url", &home);
        let inner_html = self.templates.render("error", &ctx)?;

        let title = format!("{} | {}", messages.t("Error.title"), self.config.site.title);
        let ctx = self
            .base_context(locale, &title, &inner_html, messages)
            .with_var("canonical_url", self.config.url_for(&home));
        Ok(self.templates.render("base", &ctx)?)
    }

    /// Generate redirect HTML.
    pub fn generate_redirect(&self, redirect_url: &str) -> Result<String> {
        let ctx = TemplateContext::new().with_var("redirect_url", escape_html(redirect_url));
        self.templates
            .render("redirect", &ctx)
            .map_err(HtmlError::from)
    }

    /// Get the output path for a page.
    #[must_use]
    pub fn output_path(&self, page: &LocalizedPage, output_dir: &Path) -> PathBuf {
        let dir = output_dir.join(&page.locale);
        if page.is_home() {
            dir.join("index.html")
        } else {
            dir.join(&page.slug).join("index.html")
        }
    }

    fn home_path(&self, locale: Option<&str>) -> String {
        locale.map_or_else(|| "/".to_string(), |l| url::localized_path(l, "/"))
    }

    fn base_context(
        &self,
        locale: &str,
        title: &str,
        content: &str,
        messages: &Messages,
    ) -> TemplateContext {
        let mut ctx = TemplateContext::new()
            .with_var("lang", locale)
            .with_var("title", escape_html(title))
            .with_var("site_title", escape_html(&self.config.site.title))
            .with_var("home_url", url::localized_path(locale, "/"))
            .with_var("content", content);

        if let Some(guide_url) = &self.config.site.guide_url {
            ctx.insert(
                "guide_link",
                format!(
                    r#"<a href="{}">{}</a>"#,
                    escape_html(guide_url),
                    escape_html(messages.t("Header.guide"))
                ),
            );
        }

        ctx
    }
}
