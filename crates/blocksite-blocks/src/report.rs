//! Diagnostics for unresolved renderers.

use std::sync::{Mutex, PoisonError};

use tracing::error;

/// Sink for developer diagnostics raised during a render pass.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: &str);
}

/// Logs every diagnostic at `error` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, message: &str) {
        error!("{message}");
    }
}

/// Keeps every diagnostic so the caller can inspect or fail on them.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Mutex<Vec<String>>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
