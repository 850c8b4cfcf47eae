//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    url,
};

/// Environment variable that overrides `site.url`.
pub const SITE_URL_ENV: &str = "SITE_URL";

/// Environment variable that overrides `lighthouse.number_of_runs`.
pub const LHCI_RUNS_ENV: &str = "LHCI_NUMBER_OF_RUNS";

/// Prefix of layered settings: `BLOCKSITE__SITE__TITLE` sets `site.title`.
pub const ENV_PREFIX: &str = "BLOCKSITE";

/// Main configuration structure for Blocksite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Locale settings.
    #[serde(default)]
    pub i18n: I18nConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Sitemap settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,

    /// Lighthouse CI settings.
    #[serde(default)]
    pub lighthouse: LighthouseConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, shown in the header and the page titles.
    pub title: String,

    /// Public URL of the site (e.g., "https://example.com").
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Link shown in the header navigation.
    #[serde(default)]
    pub guide_url: Option<String>,
}

/// Locale configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Supported locales, in display order.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Locale used when none is specified. Must be one of `locales`.
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for the generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding exported page records.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Directory holding block templates.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Directory holding per-locale message catalogues.
    #[serde(default = "default_messages_dir")]
    pub messages_dir: String,

    /// Directory copied verbatim into the output.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// Whether to render draft records.
    #[serde(default)]
    pub drafts: bool,
}

/// Sitemap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Paths not managed by the CMS that belong in the sitemap.
    #[serde(default)]
    pub static_routes: Vec<String>,

    /// Maximum number of URLs per sitemap file.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Whether robots.txt is generated.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed paths.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Disallowed paths.
    #[serde(default)]
    pub disallow: Vec<String>,
}

/// Lighthouse CI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LighthouseConfig {
    /// Number of runs per URL.
    #[serde(default = "default_runs")]
    pub number_of_runs: u32,

    /// Desktop category thresholds.
    #[serde(default = "CategoryThresholds::desktop")]
    pub desktop: CategoryThresholds,

    /// Mobile category thresholds.
    #[serde(default = "CategoryThresholds::mobile")]
    pub mobile: CategoryThresholds,
}

/// Minimum Lighthouse scores per category (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryThresholds {
    pub performance: f64,
    pub accessibility: f64,
    #[serde(rename = "best-practices", alias = "best_practices")]
    pub best_practices: f64,
    pub seo: f64,
}

impl CategoryThresholds {
    /// Default desktop thresholds.
    pub fn desktop() -> Self {
        Self {
            performance: 0.9,
            accessibility: 0.9,
            best_practices: 0.9,
            seo: 0.9,
        }
    }

    /// Default mobile thresholds.
    pub fn mobile() -> Self {
        Self {
            performance: 0.6,
            ..Self::desktop()
        }
    }
}

// Default value functions
fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_locales() -> Vec<String> {
    vec!["fr".to_string(), "en".to_string()]
}

fn default_locale() -> String {
    "fr".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_messages_dir() -> String {
    "messages".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_runs() -> u32 {
    1
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            default_locale: default_locale(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            content_dir: default_content_dir(),
            templates_dir: default_templates_dir(),
            messages_dir: default_messages_dir(),
            static_dir: default_static_dir(),
            environment: Environment::default(),
            drafts: false,
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            static_routes: Vec::new(),
            page_size: default_page_size(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow: Vec::new(),
            disallow: Vec::new(),
        }
    }
}

impl Default for LighthouseConfig {
    fn default() -> Self {
        Self {
            number_of_runs: default_runs(),
            desktop: CategoryThresholds::desktop(),
            mobile: CategoryThresholds::mobile(),
        }
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the site title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                url: default_site_url(),
                description: None,
                guide_url: None,
            },
            i18n: I18nConfig::default(),
            build: BuildConfig::default(),
            sitemap: SitemapConfig::default(),
            robots: RobotsConfig::default(),
            lighthouse: LighthouseConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// `SITE_URL` and `LHCI_NUMBER_OF_RUNS` from the process environment take
    /// precedence over the file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file layered with `BLOCKSITE__*`
    /// environment variables.
    ///
    /// `SITE_URL` and `LHCI_NUMBER_OF_RUNS` are applied last.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(path, None, |key| std::env::var(key).ok())
    }

    fn load_layered(
        path: &Path,
        vars: Option<config::Map<String, String>>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(vars),
            )
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(site_url) = lookup(SITE_URL_ENV).filter(|v| !v.is_empty()) {
            self.site.url = site_url;
        }

        if let Some(runs) = lookup(LHCI_RUNS_ENV) {
            match runs.parse::<u32>() {
                Ok(n) => self.lighthouse.number_of_runs = n,
                Err(_) => tracing::warn!(value = %runs, "ignoring invalid {LHCI_RUNS_ENV}"),
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.url.is_empty() {
            return Err(CoreError::config("site.url cannot be empty"));
        }

        if self.i18n.locales.is_empty() {
            return Err(CoreError::config("i18n.locales cannot be empty"));
        }

        if !self.i18n.locales.contains(&self.i18n.default_locale) {
            return Err(CoreError::config(format!(
                "i18n.default_locale '{}' is not one of i18n.locales",
                self.i18n.default_locale
            )));
        }

        if self.sitemap.page_size == 0 {
            return Err(CoreError::config("sitemap.page_size must be positive"));
        }

        if !self.site.url.starts_with("http") {
            tracing::warn!("site.url should start with http:// or https://");
        }

        Ok(())
    }

    /// Whether this is a production build.
    pub fn is_production(&self) -> bool {
        self.build.environment == Environment::Production
    }

    /// Site URL without trailing slash.
    pub fn base_url(&self) -> String {
        url::base_url(&self.site.url, None)
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        url::base_url(&self.site.url, Some(path))
    }

    /// Get the full localized URL for an href.
    pub fn localized_url(&self, href: &str, locale: &str) -> String {
        url::localized_url(&self.site.url, href, locale)
    }

    /// Directory holding exported page records.
    pub fn content_dir(&self) -> PathBuf {
        PathBuf::from(&self.build.content_dir)
    }

    /// Directory holding block templates.
    pub fn templates_dir(&self) -> PathBuf {
        PathBuf::from(&self.build.templates_dir)
    }

    /// Directory holding per-locale message catalogues.
    pub fn messages_dir(&self) -> PathBuf {
        PathBuf::from(&self.build.messages_dir)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[site]
title = "Test Site"
url = "https://example.com"

[i18n]
locales = ["en", "de"]
default_locale = "en"

[build]
output_dir = "dist"
environment = "production"

[sitemap]
static_routes = ["/", "/contact-us"]
page_size = 50

[robots]
disallow = ["/api"]

[lighthouse]
number_of_runs = 3

[lighthouse.mobile]
performance = 0.5
accessibility = 0.8
best-practices = 0.8
seo = 0.8
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blocksite.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let mut config: Config = toml::from_str(&create_test_config()).expect("parse");
        config.validate().expect("valid");

        assert_eq!(config.site.title, "Test Site");
        assert_eq!(config.site.url, "https://example.com");
        assert_eq!(config.i18n.locales, vec!["en", "de"]);
        assert_eq!(config.i18n.default_locale, "en");
        assert_eq!(config.build.output_dir, "dist");
        assert!(config.is_production());
        assert_eq!(config.sitemap.static_routes, vec!["/", "/contact-us"]);
        assert_eq!(config.sitemap.page_size, 50);
        assert_eq!(config.robots.disallow, vec!["/api"]);
        assert_eq!(config.lighthouse.number_of_runs, 3);
        assert_eq!(config.lighthouse.mobile.performance, 0.5);
        assert_eq!(config.lighthouse.desktop, CategoryThresholds::desktop());

        config.apply_env(|_| None);
        assert_eq!(config.site.url, "https://example.com");
        assert!(Config::load(&config_path).is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blocksite.toml");
        let minimal_config = r#"
[site]
title = "Minimal Site"
"#;
        std::fs::write(&config_path, minimal_config).expect("write");

        let config: Config = toml::from_str(minimal_config).expect("parse");

        assert_eq!(config.site.url, "http://localhost:3000");
        assert_eq!(config.i18n.locales, vec!["fr", "en"]);
        assert_eq!(config.i18n.default_locale, "fr");
        assert_eq!(config.build.output_dir, "public");
        assert_eq!(config.build.content_dir, "content");
        assert_eq!(config.build.environment, Environment::Development);
        assert!(!config.build.drafts);
        assert_eq!(config.sitemap.page_size, 100);
        assert!(config.robots.enabled);
        assert_eq!(config.lighthouse.number_of_runs, 1);
        assert_eq!(config.lighthouse.mobile.performance, 0.6);
        assert_eq!(config.lighthouse.mobile.seo, 0.9);
    }

    #[test]
    fn test_load_layered_env() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blocksite.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let vars = config::Map::from_iter([
            ("BLOCKSITE__SITE__TITLE".to_string(), "From Env".to_string()),
            ("BLOCKSITE__BUILD__OUTPUT_DIR".to_string(), "out".to_string()),
            ("UNRELATED".to_string(), "ignored".to_string()),
        ]);
        let config = Config::load_layered(&config_path, Some(vars), |key| {
            (key == SITE_URL_ENV).then(|| "https://preview.example.com".to_string())
        })
        .expect("load");

        assert_eq!(config.site.title, "From Env");
        assert_eq!(config.build.output_dir, "out");
        assert_eq!(config.site.url, "https://preview.example.com");
        assert_eq!(config.i18n.locales, vec!["en", "de"]);
        assert_eq!(config.sitemap.page_size, 50);
        assert_eq!(config.lighthouse.mobile.performance, 0.5);
        assert!(config.is_production());
    }

    #[test]
    fn test_load_with_env_file_values() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("blocksite.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_layered(&config_path, Some(config::Map::new()), |_| None)
            .expect("load");
        assert_eq!(config.site.title, "Test Site");
        assert_eq!(config.lighthouse.number_of_runs, 3);

        let missing = Config::load_with_env(&dir.path().join("missing.toml"));
        assert!(missing.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::new("Env");
        config.apply_env(|key| match key {
            SITE_URL_ENV => Some("https://example.org/".to_string()),
            LHCI_RUNS_ENV => Some("5".to_string()),
            _ => None,
        });

        assert_eq!(config.site.url, "https://example.org/");
        assert_eq!(config.base_url(), "https://example.org");
        assert_eq!(config.lighthouse.number_of_runs, 5);
    }

    #[test]
    fn test_invalid_runs_env_is_ignored() {
        let mut config = Config::new("Env");
        config.apply_env(|key| (key == LHCI_RUNS_ENV).then(|| "many".to_string()));
        assert_eq!(config.lighthouse.number_of_runs, 1);
    }

    #[test]
    fn test_url_for() {
        let mut config = Config::new("Test");
        config.site.url = "https://example.com/".to_string();

        assert_eq!(config.url_for("/about"), "https://example.com/about");
        assert_eq!(config.url_for("about"), "https://example.com/about");
        assert_eq!(
            config.localized_url("/contact", "en"),
            "https://example.com/en/contact"
        );
    }

    #[test]
    fn test_config_validation_empty_title() {
        let config = Config::new("");
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("title cannot be empty")
        );
    }

    #[test]
    fn test_config_validation_unknown_default_locale() {
        let mut config = Config::new("Test");
        config.i18n.default_locale = "de".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_locale"));
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/blocksite.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
