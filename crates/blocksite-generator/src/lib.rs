//! Blocksite Generator Library
//!
//! Static site generation engine for Blocksite.
//!
//! # Modules
//!
//! - [`template`] - Page layouts with optional overrides
//! - [`html`] - HTML generation for pages and error pages
//! - [`collector`] - Page record collection and indexing
//! - [`sitemap`] - XML sitemap generation, split into an index for large sites
//! - [`robots`] - robots.txt generation
//! - [`lighthouse`] - Lighthouse CI inputs
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod html;
pub mod lighthouse;
pub mod robots;
pub mod sitemap;
pub mod template;

pub use build::{BuildError, BuildStats, Builder, copy_static};
pub use collector::{ContentCollector, RouteParams, SiteContent};
pub use html::HtmlGenerator;
pub use lighthouse::{FormFactor, LighthouseRc, lhci_urls};
pub use robots::RobotsGenerator;
pub use sitemap::{SitemapGenerator, SitemapOutput};
pub use template::TemplateRegistry;
