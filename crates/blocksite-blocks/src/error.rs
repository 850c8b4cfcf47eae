//! Renderer resolution errors.

use thiserror::Error;

use crate::key::RendererKey;

/// Why a renderer could not be loaded for a key.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No renderer module exists for the key.
    #[error("no renderer module at {location}")]
    NotFound { key: RendererKey, location: String },

    /// The module exists but cannot be used as a renderer.
    #[error("renderer module at {location} is unusable: {reason}")]
    Unusable {
        key: RendererKey,
        location: String,
        reason: String,
    },

    /// Reading the module failed.
    #[error("failed to read renderer module at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Create a not-found error.
    pub fn not_found(key: &RendererKey, location: impl Into<String>) -> Self {
        Self::NotFound {
            key: key.clone(),
            location: location.into(),
        }
    }

    /// Create an unusable-module error.
    pub fn unusable(
        key: &RendererKey,
        location: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Unusable {
            key: key.clone(),
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while rendering a block list.
///
/// These never escape [`ContentRenderer::render_all`](crate::ContentRenderer::render_all);
/// they are reported and the affected block renders as empty output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Neither a registry nor the loader produced a renderer.
    #[error("renderer \"{key}\" not found")]
    Unresolved {
        key: RendererKey,
        location: String,
        #[source]
        source: LoadError,
    },
}

impl RenderError {
    /// The key that failed to resolve.
    pub fn key(&self) -> &RendererKey {
        match self {
            Self::Unresolved { key, .. } => key,
        }
    }

    /// Developer-facing explanation of an unresolved renderer.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Unresolved {
                key,
                location,
                source,
            } => format!(
                r#"Renderer "{key}" not found ({source}).

Please ensure that:
 - The renderer exists at "{location}" and is a usable template, or is a built-in block.
 - The CMS "__typename" follows the naming convention (i.e. ends with "Record" so that "{key}" is derived properly).
 - If you are using a custom renderer override, it is registered in the component registry under "{key}".
 - The file path and naming are case-sensitive and match exactly."#
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_diagnostic() {
        let key = RendererKey::new("NonExistent");
        let location = "blocks/NonExistent/NonExistent.html";
        let err = RenderError::Unresolved {
            key: key.clone(),
            location: location.to_string(),
            source: LoadError::not_found(&key, location),
        };

        assert_eq!(err.key(), &key);
        assert_eq!(err.to_string(), r#"renderer "NonExistent" not found"#);

        let message = err.diagnostic();
        assert!(message.contains(r#"Renderer "NonExistent" not found"#));
        assert!(message.contains(location));
        assert!(message.contains("naming convention"));
        assert!(message.contains("component registry"));
    }

    #[test]
    fn test_unusable_message() {
        let err = LoadError::unusable(&RendererKey::new("Foo"), "blocks/Foo/Foo.html", "empty");
        assert!(err.to_string().contains("unusable: empty"));
    }
}
