//! Blocksite UI Components
//!
//! Leptos primitives shared by Blocksite page layouts.
//!
//! # Components
//!
//! ## Layout
//! - [`Container`] - Centered, width-constrained wrapper
//!
//! ## Text
//! - [`Typography`] - Headings and body text in the site's type scale
//!
//! ## Content
//! - [`BlockList`] - Renders the output of a block list render pass
//!
//! Class names are computed by plain functions ([`cn`], [`container_class`],
//! [`typography_class`]) so they can be tested without a DOM.
//!
//! # Example
//!
//! ```ignore
//! use leptos::prelude::*;
//! use blocksite_ui::{BlockList, Container, Typography, TypographyVariant};
//!
//! #[component]
//! fn Page(blocks: Vec<blocksite_blocks::RenderedBlock>) -> impl IntoView {
//!     view! {
//!         <Container>
//!             <Typography variant=TypographyVariant::H1>"Accueil"</Typography>
//!             <BlockList blocks=blocks />
//!         </Container>
//!     }
//! }
//! ```

pub mod blocks;
pub mod class;
pub mod container;
pub mod typography;

pub use blocks::BlockList;
pub use class::cn;
pub use container::{Container, container_class};
pub use typography::{Typography, TypographyVariant, typography_class};
