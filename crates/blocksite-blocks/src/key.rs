//! Renderer keys derived from CMS type tags.

use std::{borrow::Borrow, fmt};

/// Suffix the CMS appends to every block type name.
pub const RECORD_SUFFIX: &str = "Record";

/// Name of the renderer for a block type, e.g. `VideoBlock`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RendererKey(String);

impl RendererKey {
    /// Create a key from a renderer name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the key for a CMS type tag.
    pub fn from_type_tag(type_tag: &str) -> Self {
        Self(type_tag.strip_suffix(RECORD_SUFFIX).unwrap_or(type_tag).to_string())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Derive the renderer key for a type tag by stripping one trailing
/// [`RECORD_SUFFIX`]. Tags without the suffix are returned unchanged.
pub fn derive_key(type_tag: &str) -> RendererKey {
    RendererKey::from_type_tag(type_tag)
}

impl fmt::Display for RendererKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RendererKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RendererKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for RendererKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RendererKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
