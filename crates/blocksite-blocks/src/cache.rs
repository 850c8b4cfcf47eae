//! Process-wide cache of lazily loaded renderers.

use std::{fmt, sync::Arc};

use scc::HashMap;

use crate::{key::RendererKey, registry::SharedRenderer};

/// Cache of renderers produced by a [`BlockLoader`](crate::BlockLoader).
///
/// Entries are never evicted. When two passes load the same key at once the
/// first insert is kept and both observe it. Failed loads are never stored.
#[derive(Default)]
pub struct LazyRendererCache {
    renderers: HashMap<RendererKey, SharedRenderer>,
}

impl LazyRendererCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached renderer.
    pub fn get(&self, key: &RendererKey) -> Option<SharedRenderer> {
        self.renderers.read(key, |_, renderer| Arc::clone(renderer))
    }

    /// Store a renderer unless one is already cached, returning the cached one.
    pub fn get_or_insert(&self, key: RendererKey, renderer: SharedRenderer) -> SharedRenderer {
        self.renderers
            .entry(key)
            .or_insert(renderer)
            .get()
            .clone()
    }

    /// Whether a renderer is cached for the key.
    pub fn contains(&self, key: &RendererKey) -> bool {
        self.renderers.contains(key)
    }

    /// Number of cached renderers.
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for LazyRendererCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRendererCache")
            .field("len", &self.len())
            .finish()
    }
}
