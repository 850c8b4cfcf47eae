//! Blocksite CLI Library
//!
//! Core functionality of the `blocksite` binary, exposed as a library so the
//! commands can be driven from tests and other tools.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, watch, new, check, lighthouse)
//! - [`server`] - Embedded development server with live reload
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use blocksite::cmd;
//!
//! cmd::build::run(Path::new("blocksite.toml"), None, false, None, false).unwrap();
//! ```

use std::path::{Path, PathBuf};

pub mod cmd;
pub mod server;

pub use blocksite_core::{Config, PageRecord};
pub use blocksite_generator::{BuildStats, Builder, ContentCollector, SiteContent};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// blocksite::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Directory the site lives in: the parent of its config file.
pub fn site_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve the relative directories of `config` against `root`.
pub fn rebase(config: &mut Config, root: &Path) {
    let build = &mut config.build;
    for dir in [
        &mut build.output_dir,
        &mut build.content_dir,
        &mut build.templates_dir,
        &mut build.messages_dir,
        &mut build.static_dir,
    ] {
        if Path::new(dir.as_str()).is_relative() {
            *dir = root.join(dir.as_str()).to_string_lossy().to_string();
        }
    }
}

/// Load the config at `config_path`, layered with `BLOCKSITE__*` environment
/// variables, with its directories rebased onto the site root.
pub fn load_config(config_path: &Path) -> blocksite_core::Result<Config> {
    let mut config = Config::load_with_env(config_path)?;
    rebase(&mut config, &site_root(config_path));
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_root() {
        assert_eq!(site_root(Path::new("blocksite.toml")), PathBuf::from("."));
        assert_eq!(site_root(Path::new("demo/blocksite.toml")), PathBuf::from("demo"));
    }

    #[test]
    fn test_rebase() {
        let mut config = Config::new("Test");
        config.build.static_dir = "/srv/static".to_string();

        rebase(&mut config, Path::new("site"));

        assert_eq!(Path::new(&config.build.content_dir), Path::new("site/content"));
        assert_eq!(Path::new(&config.build.output_dir), Path::new("site/public"));
        assert_eq!(config.build.static_dir, "/srv/static");
    }

    #[test]
    fn test_load_config_rebases() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("blocksite.toml");
        std::fs::write(
            &config_path,
            "[site]\ntitle = \"Test\"\n\n[build]\ncontent_dir = \"cms\"\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();

        assert_eq!(config.site.title, "Test");
        assert_eq!(config.content_dir(), dir.path().join("cms"));
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }
}
