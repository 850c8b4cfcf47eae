//! Check command - validate configuration and content

use std::{collections::BTreeSet, path::Path, sync::Arc};

use blocksite_blocks::{CollectingReporter, ContentRenderer, is_placeholder};
use blocksite_core::Config;
use blocksite_generator::{ContentCollector, SiteContent};
use color_eyre::eyre::{Result, bail};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Outcome of rendering every block once without writing anything.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DryRender {
    pub pages: usize,
    pub blocks: usize,
    pub placeholders: usize,
    /// Unique diagnostics, sorted.
    pub unresolved: BTreeSet<String>,
}

/// Run the check command.
///
/// Validates configuration and all page records. Development sites are
/// always checked strictly.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match crate::load_config(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            bail!("Configuration error: {e}");
        }
    };

    let strict = strict || !config.is_production();

    println!("\nChecking message catalogues...");
    for warning in quick_validate(&config) {
        result.add_warning(warning);
    }

    println!("\nChecking page records...");
    let content = ContentCollector::new(config.clone(), config.content_dir()).collect()?;
    for failure in &content.failed {
        result.add_error(failure.to_string());
    }
    if content.records.is_empty() {
        result.add_warning("No page records found");
    }
    check_translations(&config, &content, &mut result);

    println!("\nRendering blocks...");
    let dry = dry_render(&config, &content);
    println!(
        "  {} blocks on {} pages, {} placeholder(s) skipped",
        dry.blocks, dry.pages, dry.placeholders
    );
    for message in &dry.unresolved {
        result.add_warning(message.clone());
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Quick validation for build/watch commands.
///
/// Returns warnings for locales without a message catalogue (non-fatal).
pub fn quick_validate(config: &Config) -> Vec<String> {
    let messages_dir = config.messages_dir();

    config
        .i18n
        .locales
        .iter()
        .filter(|locale| !messages_dir.join(format!("{locale}.json")).exists())
        .map(|locale| {
            format!(
                "No message catalogue for '{locale}' in {}",
                messages_dir.display()
            )
        })
        .collect()
}

/// Warn about records that lack a configured locale.
fn check_translations(config: &Config, content: &SiteContent, result: &mut ValidationResult) {
    for record in &content.records {
        let missing: Vec<&str> = config
            .i18n
            .locales
            .iter()
            .filter(|locale| !record.locales.contains_key(locale.as_str()))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() {
            result.add_warning(format!(
                "Page '{}' has no translation for: {}",
                record.id,
                missing.join(", ")
            ));
        }
    }
}

/// Render every page's blocks with a collecting reporter.
pub fn dry_render(config: &Config, content: &SiteContent) -> DryRender {
    let reporter = Arc::new(CollectingReporter::new());
    let renderer = ContentRenderer::builder()
        .templates_dir(config.templates_dir())
        .reporter(reporter.clone())
        .build();

    let mut dry = DryRender::default();
    for page in content.iter() {
        dry.pages += 1;
        dry.blocks += page.content.len();
        dry.placeholders += page.content.iter().filter(|b| is_placeholder(b)).count();
        renderer.render_all(&page.content, None);
    }

    dry.unresolved = reporter.messages().into_iter().collect();
    dry
}
