//! Error types for the Blocksite core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Blocksite.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A page record could not be read as JSON.
    #[error("Invalid page record {path}: {message}")]
    Record { path: PathBuf, message: String },

    /// Message catalogue error.
    #[error("Messages error in {path}: {message}")]
    Messages { path: PathBuf, message: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new page record error.
    pub fn record(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Record {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new message catalogue error.
    pub fn messages(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Messages {
            path: path.into(),
            message: message.into(),
        }
    }
}
