//! Build command - generates the static site

use std::{path::Path, time::Instant};

use blocksite_generator::{BuildStats, Builder};
use color_eyre::eyre::{Result, WrapErr};

use super::check::quick_validate;

/// Run the build command.
///
/// Builds the static site from page records to the output directory.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    drafts: bool,
    site_url: Option<&str>,
    strict: bool,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, drafts, ?site_url, strict, "Starting build");

    let mut config = crate::load_config(config_path).wrap_err("Failed to load configuration")?;

    let warnings = quick_validate(&config);
    if !warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warn in &warnings {
            println!("  ⚠ {warn}");
        }
        println!();
    }

    if let Some(output) = output {
        config.build.output_dir = output.to_string_lossy().to_string();
    }

    if drafts {
        config.build.drafts = true;
    }

    if let Some(url) = site_url {
        tracing::info!(url, "Overriding site URL from CLI");
        config.site.url = url.to_string();
    }

    tracing::debug!(?config, "Loaded configuration");

    let output_dir = config.build.output_dir.clone();
    let stats = Builder::from_config(config)
        .strict(strict)
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    print_stats(&stats);
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {output_dir}");
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

/// Print build statistics.
pub fn print_stats(stats: &BuildStats) {
    println!();
    println!("  Pages:        {:>6}", stats.pages);
    println!("  Error pages:  {:>6}", stats.error_pages);
    println!("  Placeholders: {:>6}", stats.skipped_blocks);
    println!("  Unresolved:   {:>6}", stats.unresolved_blocks);
    println!("  Sitemap URLs: {:>6}", stats.sitemap_urls);
    println!("  Assets:       {:>6}", stats.assets);
    println!();
}
