//! Build orchestration.
//!
//! Coordinates the full site build process.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Instant,
};

use blocksite_blocks::{
    CollectingReporter, ComponentRegistry, ContentRenderer, ErrorReporter, LazyRendererCache,
    TracingReporter, is_placeholder,
};
use blocksite_core::{Config, CoreError, LocalizedPage, Messages, TemplateError, url};
use chrono::Utc;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    collector::{CollectorError, ContentCollector, SiteContent},
    html::{HtmlError, HtmlGenerator},
    robots::{RobotsError, RobotsGenerator},
    sitemap::{SitemapError, SitemapGenerator},
    template::TemplateRegistry,
};

/// Locale of the root not-found page.
pub const ROOT_NOT_FOUND_LOCALE: &str = "en";

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Layout error.
    #[error("layout error: {0}")]
    Layout(#[from] TemplateError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Robots generation error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),

    /// Messages or configuration error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Static directory traversal error.
    #[error("static files error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Strict build with unresolved block renderers.
    #[error("{} unresolved block renderer(s)", diagnostics.len())]
    Unresolved { diagnostics: Vec<String> },

    /// Strict build where some pages could not be generated.
    #[error("{} page(s) failed to generate", failures.len())]
    Pages { failures: Vec<String> },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages generated.
    pub pages: usize,

    /// Number of placeholder blocks skipped.
    pub skipped_blocks: usize,

    /// Number of unresolved renderer reports (one per key per page).
    pub unresolved_blocks: usize,

    /// Number of not-found and error pages generated.
    pub error_pages: usize,

    /// Number of sitemap URLs.
    pub sitemap_urls: usize,

    /// Number of static files copied.
    pub assets: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Reporter used by builds: logs every diagnostic and keeps it for strict mode.
#[derive(Debug, Default)]
struct BuildReporter {
    collected: CollectingReporter,
}

impl ErrorReporter for BuildReporter {
    fn report(&self, message: &str) {
        TracingReporter.report(message);
        self.collected.report(message);
    }
}

/// Result of the page generation pass.
#[derive(Debug, Default)]
struct PageOutcome {
    written: usize,
    skipped: usize,
    failures: Vec<String>,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    templates_dir: Option<PathBuf>,
    messages_dir: Option<PathBuf>,
    static_dir: Option<PathBuf>,
    defaults: ComponentRegistry,
    overrides: Option<ComponentRegistry>,
    cache: Arc<LazyRendererCache>,
    strict: bool,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            templates_dir: None,
            messages_dir: None,
            static_dir: None,
            defaults: ComponentRegistry::new(),
            overrides: None,
            cache: Arc::new(LazyRendererCache::new()),
            strict: false,
        }
    }

    /// Create a builder using the directories named in the configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let content_dir = config.content_dir();
        let output_dir = PathBuf::from(&config.build.output_dir);
        let templates_dir = config.templates_dir();
        let messages_dir = config.messages_dir();
        let static_dir = PathBuf::from(&config.build.static_dir);

        Self::new(config, content_dir, output_dir)
            .with_templates_dir(templates_dir)
            .with_messages_dir(messages_dir)
            .with_static_dir(static_dir)
    }

    /// Set the templates directory (block templates and layout overrides).
    #[must_use]
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    /// Set the message catalogues directory.
    #[must_use]
    pub fn with_messages_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.messages_dir = Some(dir.into());
        self
    }

    /// Set the static assets directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Set the default block registry.
    #[must_use]
    pub fn with_defaults(mut self, defaults: ComponentRegistry) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set renderers taking precedence over the defaults for every page.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ComponentRegistry) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Share a lazy renderer cache across builds.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<LazyRendererCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Fail the build when any block renderer cannot be resolved.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            strict = self.strict,
            "starting build"
        );

        self.clean_output()?;

        let collector = ContentCollector::new(self.config.clone(), &self.content_dir);
        let content = collector.collect()?;

        let messages = self.load_messages()?;
        let layouts = match &self.templates_dir {
            Some(dir) => TemplateRegistry::with_overrides(dir)?,
            None => TemplateRegistry::new(),
        };
        let generator = HtmlGenerator::with_templates(self.config.clone(), layouts);

        let reporter = Arc::new(BuildReporter::default());
        let renderer = self.content_renderer(reporter.clone());

        let pages = self.generate_pages(&generator, &renderer, &content, &messages)?;
        stats.pages = pages.written;
        stats.skipped_blocks = pages.skipped;
        stats.unresolved_blocks = reporter.collected.len();

        stats.error_pages = self.generate_error_pages(&generator, &messages)?;
        self.generate_root_redirect(&generator)?;

        let sitemap = SitemapGenerator::new(self.config.clone()).write(
            &content,
            &self.output_dir,
            Utc::now(),
        )?;
        stats.sitemap_urls = sitemap.urls;
        RobotsGenerator::new(self.config.clone()).generate(&self.output_dir, &sitemap.parts)?;

        if let Some(static_dir) = &self.static_dir {
            stats.assets = copy_static(static_dir, &self.output_dir)?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            skipped_blocks = stats.skipped_blocks,
            unresolved_blocks = stats.unresolved_blocks,
            error_pages = stats.error_pages,
            sitemap_urls = stats.sitemap_urls,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        if self.strict && !pages.failures.is_empty() {
            return Err(BuildError::Pages {
                failures: pages.failures,
            });
        }

        if self.strict && !reporter.collected.is_empty() {
            return Err(BuildError::Unresolved {
                diagnostics: reporter.collected.messages(),
            });
        }

        Ok(stats)
    }

    fn content_renderer(&self, reporter: Arc<dyn ErrorReporter>) -> ContentRenderer {
        let mut builder = ContentRenderer::builder()
            .defaults(self.defaults.clone())
            .cache(Arc::clone(&self.cache))
            .reporter(reporter);

        if let Some(dir) = &self.templates_dir {
            builder = builder.templates_dir(dir);
        }

        builder.build()
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Messages for every configured locale plus the root not-found locale.
    fn load_messages(&self) -> Result<HashMap<String, Messages>> {
        let default_locale = &self.config.i18n.default_locale;
        let mut locales = self.config.i18n.locales.clone();
        if !locales.iter().any(|l| l == ROOT_NOT_FOUND_LOCALE) {
            locales.push(ROOT_NOT_FOUND_LOCALE.to_string());
        }

        locales
            .into_iter()
            .map(|locale| {
                let messages = match &self.messages_dir {
                    Some(dir) => Messages::load(dir, &locale, default_locale)?,
                    None => Messages::builtin(&locale),
                };
                Ok::<_, BuildError>((locale, messages))
            })
            .collect()
    }

    /// Render and write every localized page in parallel.
    fn generate_pages(
        &self,
        generator: &HtmlGenerator,
        renderer: &ContentRenderer,
        content: &SiteContent,
        messages: &HashMap<String, Messages>,
    ) -> Result<PageOutcome> {
        let pages: Vec<_> = content.iter().collect();
        let skipped = AtomicUsize::new(0);

        info!(count = pages.len(), "generating HTML pages");

        let results: Vec<_> = pages
            .par_iter()
            .map(|page| {
                let placeholders = page.content.iter().filter(|b| is_placeholder(b)).count();
                skipped.fetch_add(placeholders, Ordering::Relaxed);

                let blocks_html = renderer.render_html(&page.content, self.overrides.as_ref());
                let alternates: Vec<_> = content
                    .translations(&page.record_id)
                    .into_iter()
                    .map(|(locale, translation)| (locale, translation.slug.as_str()))
                    .collect();

                let page_messages = messages
                    .get(&page.locale)
                    .cloned()
                    .unwrap_or_else(|| Messages::builtin(&page.locale));
                let html =
                    generator.generate_page(page, &blocks_html, &alternates, &page_messages)?;
                self.write_page(generator, page, &html)
            })
            .collect();

        let mut outcome = PageOutcome::default();
        for (page, result) in pages.iter().zip(results) {
            match result {
                Ok(()) => outcome.written += 1,
                Err(e) => {
                    warn!(
                        locale = %page.locale,
                        slug = %page.slug,
                        error = %e,
                        "failed to generate page"
                    );
                    outcome
                        .failures
                        .push(format!("/{}/{}: {e}", page.locale, page.slug));
                }
            }
        }

        outcome.skipped = skipped.into_inner();
        Ok(outcome)
    }

    fn write_page(&self, generator: &HtmlGenerator, page: &LocalizedPage, html: &str) -> Result<()> {
        let output_path = generator.output_path(page, &self.output_dir);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;

        debug!(path = %output_path.display(), "wrote page");
        Ok(())
    }

    /// Per-locale `404.html` and `500.html`, plus the root `404.html`.
    fn generate_error_pages(
        &self,
        generator: &HtmlGenerator,
        messages: &HashMap<String, Messages>,
    ) -> Result<usize> {
        let mut count = 0;

        for locale in &self.config.i18n.locales {
            let locale_messages = messages
                .get(locale)
                .cloned()
                .unwrap_or_else(|| Messages::builtin(locale));
            let dir = self.output_dir.join(locale);
            fs::create_dir_all(&dir)?;

            let html = generator.generate_not_found(Some(locale), &locale_messages)?;
            fs::write(dir.join("404.html"), html)?;

            let html = generator.generate_error(locale, &locale_messages)?;
            fs::write(dir.join("500.html"), html)?;

            count += 2;
        }

        let root_messages = messages
            .get(ROOT_NOT_FOUND_LOCALE)
            .cloned()
            .unwrap_or_else(|| Messages::builtin(ROOT_NOT_FOUND_LOCALE));
        let html = generator.generate_not_found(None, &root_messages)?;
        fs::write(self.output_dir.join("404.html"), html)?;
        count += 1;

        debug!(count, "generated error pages");
        Ok(count)
    }

    /// Root `index.html` redirecting to the default locale.
    fn generate_root_redirect(&self, generator: &HtmlGenerator) -> Result<()> {
        let target = url::localized_path(&self.config.i18n.default_locale, "/");
        let html = generator.generate_redirect(&target)?;
        fs::write(self.output_dir.join("index.html"), html)?;
        Ok(())
    }
}

/// Copy `static_dir` into `output_dir`, skipping hidden entries.
///
/// Returns the number of files copied. A missing directory copies nothing.
pub fn copy_static(static_dir: &Path, output_dir: &Path) -> Result<usize> {
    if !static_dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    let walker = WalkDir::new(static_dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(static_dir).unwrap_or(entry.path());
        let dest = output_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest)?;
        count += 1;
    }

    debug!(count, dir = %static_dir.display(), "copied static files");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use blocksite_core::ContentBlock;
    use tempfile::TempDir;

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::new("Test Site");
        config.site.url = "https://example.com".to_string();
        config
    }

    fn write_record(content_dir: &Path, name: &str, json: &str) {
        let pages = content_dir.join("pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join(name), json).unwrap();
    }

    #[test]
    fn test_build_empty_site() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        let builder = Builder::new(test_config(), content_dir.path(), output_dir.path());
        let stats = builder.build().unwrap();

        assert_eq!(stats.pages, 0);
        assert_eq!(stats.error_pages, 5);
        assert!(output_dir.path().join("sitemap.xml").exists());
        assert!(output_dir.path().join("robots.txt").exists());
        assert!(output_dir.path().join("404.html").exists());
        assert!(output_dir.path().join("fr/404.html").exists());
        assert!(output_dir.path().join("en/500.html").exists());

        let index = fs::read_to_string(output_dir.path().join("index.html")).unwrap();
        assert!(index.contains("url=/fr"));
    }

    #[test]
    fn test_build_with_content() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        write_record(
            content_dir.path(),
            "home.json",
            r#"{ "id": "home", "locales": {
                "fr": { "slug": "", "content": [
                    { "id": "v", "__typename": "VideoBlockRecord", "videoUrl": "https://cdn.example.com/a.mp4" },
                    { "id": "p", "__typename": "ImageBlockRecord" }
                ] },
                "en": { "slug": "home", "content": [] }
            } }"#,
        );

        let builder = Builder::new(test_config(), content_dir.path(), output_dir.path());
        let stats = builder.build().unwrap();

        assert_eq!(stats.pages, 2);
        assert_eq!(stats.skipped_blocks, 1);
        assert_eq!(stats.unresolved_blocks, 0);
        assert_eq!(stats.sitemap_urls, 2);

        let fr = fs::read_to_string(output_dir.path().join("fr/index.html")).unwrap();
        assert!(fr.contains(r#"<video src="https://cdn.example.com/a.mp4" controls>"#));
        assert!(fr.contains(r#"hreflang="en" href="https://example.com/en/home""#));
        assert!(output_dir.path().join("en/home/index.html").exists());
    }

    #[test]
    fn test_build_with_overrides() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        write_record(
            content_dir.path(),
            "page.json",
            r#"{ "id": "p", "locales": { "en": { "slug": "x", "content": [
                { "id": "1", "__typename": "ImageBlockRecord", "imageUrl": "i.jpg" }
            ] } } }"#,
        );

        let builder = Builder::new(test_config(), content_dir.path(), output_dir.path())
            .with_defaults(ComponentRegistry::new().with("ImageBlock", |b: &ContentBlock| {
                format!("<img data-id=\"{}\">", b.id)
            }));
        builder.build().unwrap();

        let html = fs::read_to_string(output_dir.path().join("en/x/index.html")).unwrap();
        assert!(html.contains(r#"<img data-id="1">"#));
    }

    #[test]
    fn test_strict_build_fails_on_unresolved() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        write_record(
            content_dir.path(),
            "page.json",
            r#"{ "id": "p", "locales": { "en": { "slug": "x", "content": [
                { "id": "1", "__typename": "NonExistentRecord", "a": 1 }
            ] } } }"#,
        );

        let lenient = Builder::new(test_config(), content_dir.path(), output_dir.path());
        let stats = lenient.build().unwrap();
        assert_eq!(stats.pages, 1);
        assert_eq!(stats.unresolved_blocks, 1);

        let strict = Builder::new(test_config(), content_dir.path(), output_dir.path()).strict(true);
        match strict.build() {
            Err(BuildError::Unresolved { diagnostics }) => {
                assert_eq!(diagnostics.len(), 1);
                assert!(diagnostics[0].contains("NonExistent"));
            }
            other => panic!("expected unresolved error, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_build_fails_on_page_errors() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let templates_dir = TempDir::new().unwrap();
        write_record(
            content_dir.path(),
            "page.json",
            r#"{ "id": "p", "locales": { "en": { "slug": "x" } } }"#,
        );
        let layouts = templates_dir.path().join("layouts");
        fs::create_dir_all(&layouts).unwrap();
        fs::write(layouts.join("page.html"), "<main>{{ undefined_variable }}</main>").unwrap();

        let lenient = Builder::new(test_config(), content_dir.path(), output_dir.path())
            .with_templates_dir(templates_dir.path());
        let stats = lenient.build().unwrap();
        assert_eq!(stats.pages, 0);

        let strict = Builder::new(test_config(), content_dir.path(), output_dir.path())
            .with_templates_dir(templates_dir.path())
            .strict(true);
        match strict.build() {
            Err(BuildError::Pages { failures }) => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].starts_with("/en/x"));
                assert!(failures[0].contains("undefined_variable"));
            }
            other => panic!("expected page failures, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_with_static_dir() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let static_dir = TempDir::new().unwrap();

        fs::write(static_dir.path().join("style.css"), "body {}").unwrap();
        fs::create_dir_all(static_dir.path().join("img")).unwrap();
        fs::write(static_dir.path().join("img/logo.svg"), "<svg/>").unwrap();
        fs::write(static_dir.path().join(".DS_Store"), "").unwrap();

        let builder = Builder::new(test_config(), content_dir.path(), output_dir.path())
            .with_static_dir(static_dir.path());

        let stats = builder.build().unwrap();

        assert_eq!(stats.assets, 2);
        assert!(output_dir.path().join("style.css").exists());
        assert!(output_dir.path().join("img/logo.svg").exists());
        assert!(!output_dir.path().join(".DS_Store").exists());
    }

    #[test]
    fn test_build_stats() {
        let stats = BuildStats::default();
        assert_eq!(stats.pages, 0);
        assert_eq!(stats.duration_ms, 0);
    }
}
