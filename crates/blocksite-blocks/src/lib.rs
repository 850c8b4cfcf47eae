//! Blocksite Blocks Library
//!
//! Renders ordered lists of CMS content blocks. Each block's type tag names a
//! renderer (`VideoBlockRecord` is rendered by `VideoBlock`), looked up in a
//! caller-supplied override registry, then the default registry, then loaded
//! lazily by convention and cached for the lifetime of the process.
//!
//! # Modules
//!
//! - [`key`] - Renderer keys derived from CMS type tags
//! - [`registry`] - Renderer trait and component registries
//! - [`cache`] - Process-wide cache of lazily loaded renderers
//! - [`loader`] - Convention-based renderer loading
//! - [`components`] - Built-in block renderers
//! - [`report`] - Diagnostics for unresolved renderers
//! - [`renderer`] - The block list renderer
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use blocksite_blocks::{ComponentRegistry, ContentRenderer};
//! use blocksite_core::ContentBlock;
//!
//! let overrides = ComponentRegistry::new().with("VideoBlock", |block: &ContentBlock| {
//!     format!("<div>video {}</div>", block.id)
//! });
//!
//! let renderer = ContentRenderer::builder().build();
//! let blocks = vec![ContentBlock::new("1", "VideoBlockRecord").with_field("videoUrl", "u")];
//! let output = renderer.render_all(&blocks, Some(&overrides));
//!
//! assert_eq!(output[0].html, "<div>video 1</div>");
//! ```

pub mod cache;
pub mod components;
pub mod error;
pub mod key;
pub mod loader;
pub mod registry;
pub mod renderer;
pub mod report;

pub use cache::LazyRendererCache;
pub use error::{LoadError, RenderError};
pub use key::{RECORD_SUFFIX, RendererKey, derive_key};
pub use loader::{BlockLoader, ConventionLoader, TemplateRenderer};
pub use registry::{BlockRenderer, ComponentRegistry, NoopRenderer, SharedRenderer, merge};
pub use renderer::{ContentRenderer, ContentRendererBuilder, RenderedBlock, is_placeholder};
pub use report::{CollectingReporter, ErrorReporter, TracingReporter};
