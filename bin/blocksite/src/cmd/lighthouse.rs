//! Lighthouse command - writes Lighthouse CI inputs

use std::path::Path;

use blocksite_generator::{ContentCollector, lighthouse};
use color_eyre::eyre::{Result, WrapErr};

/// Run the lighthouse command.
pub fn run(config_path: &Path, out_dir: &Path) -> Result<()> {
    tracing::info!(?config_path, ?out_dir, "Writing Lighthouse CI inputs");

    let config = crate::load_config(config_path).wrap_err("Failed to load configuration")?;
    let content = ContentCollector::new(config.clone(), config.content_dir())
        .collect()
        .wrap_err("Failed to collect page records")?;

    let written = lighthouse::write_all(&config, &content, out_dir)
        .wrap_err("Failed to write Lighthouse files")?;

    println!(
        "✓ Wrote {} URLs ({} collected by lighthouserc)",
        written.urls, written.collected
    );
    for file in &written.files {
        println!("  {}", out_dir.join(file).display());
    }

    Ok(())
}
