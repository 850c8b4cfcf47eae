//! Robots.txt generation.

use std::{fmt::Write as _, fs, path::Path};

use blocksite_core::Config;
use thiserror::Error;
use tracing::info;

use crate::sitemap::SITEMAP_FILE;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render robots.txt.
    ///
    /// The main sitemap is always listed; production builds also list every
    /// sub-sitemap.
    pub fn render(&self, sitemap_parts: &[String]) -> String {
        let mut out = String::from("User-agent: *\n");

        for path in &self.config.robots.allow {
            let _ = writeln!(out, "Allow: {path}");
        }

        for path in &self.config.robots.disallow {
            let _ = writeln!(out, "Disallow: {path}");
        }

        out.push('\n');
        let _ = writeln!(out, "Sitemap: {}", self.config.url_for(SITEMAP_FILE));

        if self.config.is_production() {
            for part in sitemap_parts {
                let _ = writeln!(out, "Sitemap: {}", self.config.url_for(part));
            }
        }

        out
    }

    /// Write robots.txt into `output_dir`. Returns whether a file was written.
    pub fn generate(&self, output_dir: &Path, sitemap_parts: &[String]) -> Result<bool> {
        if !self.config.robots.enabled {
            return Ok(false);
        }

        info!("generating robots.txt");
        fs::write(output_dir.join("robots.txt"), self.render(sitemap_parts))?;
        Ok(true)
    }
}
