//! Blocksite Core Library
//!
//! Core types, configuration, and error handling for the Blocksite generator.

pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod template;
pub mod url;

pub use config::{Config, Environment};
pub use content::{ContentBlock, LocalizedPage, PageRecord};
pub use error::{CoreError, Result};
pub use i18n::{Locales, Messages};
pub use template::{Template, TemplateContext, TemplateError};
