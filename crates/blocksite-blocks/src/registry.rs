//! Block renderers and component registries.

use std::{collections::HashMap, fmt, sync::Arc};

use blocksite_core::ContentBlock;

use crate::key::RendererKey;

/// Renders one content block to an HTML fragment.
pub trait BlockRenderer: Send + Sync {
    /// Render the full block (including `id` and type tag).
    fn render(&self, block: &ContentBlock) -> String;
}

impl<F> BlockRenderer for F
where
    F: Fn(&ContentBlock) -> String + Send + Sync,
{
    fn render(&self, block: &ContentBlock) -> String {
        self(block)
    }
}

/// A renderer shared between registries and the lazy cache.
pub type SharedRenderer = Arc<dyn BlockRenderer>;

/// Renderer that produces no output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl BlockRenderer for NoopRenderer {
    fn render(&self, _block: &ContentBlock) -> String {
        String::new()
    }
}

/// Mapping from renderer key to renderer.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    renderers: HashMap<RendererKey, SharedRenderer>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer, replacing any previous one for the key.
    pub fn register(&mut self, key: impl Into<RendererKey>, renderer: impl BlockRenderer + 'static) {
        self.renderers.insert(key.into(), Arc::new(renderer));
    }

    /// Register an already shared renderer.
    pub fn register_shared(&mut self, key: impl Into<RendererKey>, renderer: SharedRenderer) {
        self.renderers.insert(key.into(), renderer);
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, key: impl Into<RendererKey>, renderer: impl BlockRenderer + 'static) -> Self {
        self.register(key, renderer);
        self
    }

    /// Get the renderer for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SharedRenderer> {
        self.renderers.get(key)
    }

    /// Check if a renderer is registered for a key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.renderers.contains_key(key)
    }

    /// Number of registered renderers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&RendererKey> {
        let mut keys: Vec<_> = self.renderers.keys().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Merge a default registry with an optional override registry.
///
/// The result holds every default entry, with override entries replacing
/// defaults of the same key. Neither input is modified.
pub fn merge(defaults: &ComponentRegistry, overrides: Option<&ComponentRegistry>) -> ComponentRegistry {
    let mut merged = defaults.clone();
    if let Some(overrides) = overrides {
        for (key, renderer) in &overrides.renderers {
            merged.renderers.insert(key.clone(), Arc::clone(renderer));
        }
    }
    merged
}
