// Error types for the render engine

use thiserror::Error;

/// Errors raised while resolving, bootstrapping or rendering a request.
///
/// Every variant except [`SsrError::Configuration`] is caught by
/// [`RenderEngine::render`](crate::RenderEngine::render) and turned into a
/// [`RenderResult::Error`](crate::RenderResult::Error).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SsrError {
    /// Missing or invalid construction-time configuration.
    #[error("{0}")]
    Configuration(String),

    /// The route matcher failed.
    #[error("{0}")]
    Resolution(String),

    /// The store factory failed.
    #[error("{0}")]
    StoreCreation(String),

    /// The renderer failed (invalid element, view failure).
    #[error("{0}")]
    Render(String),

    /// A view asked for a specific terminal outcome.
    #[error("{message}")]
    Signaled {
        message: String,
        status: Option<u16>,
        path: Option<String>,
    },
}

impl SsrError {
    /// Signal a redirect to `path` from inside a view.
    pub fn redirect(path: impl Into<String>, message: impl Into<String>) -> Self {
        SsrError::Signaled {
            message: message.into(),
            status: Some(302),
            path: Some(path.into()),
        }
    }

    /// Signal a not-found outcome from inside a view.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(404, message)
    }

    /// Signal an arbitrary status from inside a view.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        SsrError::Signaled {
            message: message.into(),
            status: Some(status),
            path: None,
        }
    }

    /// A plain application error with no carried status.
    pub fn message(message: impl Into<String>) -> Self {
        SsrError::Signaled {
            message: message.into(),
            status: None,
            path: None,
        }
    }

    /// Status carried by the error itself, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SsrError::Signaled { status, .. } => *status,
            _ => None,
        }
    }

    /// Status to report for this error: the carried one, else 500.
    pub fn status_code(&self) -> u16 {
        self.status().unwrap_or(500)
    }

    /// Path carried by the error itself, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            SsrError::Signaled { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}

/// Errors raised while loading [`EngineSettings`](crate::EngineSettings).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for SsrError {
    fn from(err: ConfigError) -> Self {
        SsrError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SsrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_default_to_500() {
        let err = SsrError::Render("Invalid element".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.path(), None);
        assert_eq!(err.to_string(), "Invalid element");
    }

    #[test]
    fn test_signaled_redirect_carries_status_and_path() {
        let err = SsrError::redirect("/x", "session expired");
        assert_eq!(err.status_code(), 302);
        assert_eq!(err.path(), Some("/x"));
        assert_eq!(err.to_string(), "session expired");
    }

    #[test]
    fn test_signaled_without_status() {
        let err = SsrError::message("boom");
        assert_eq!(err.status(), None);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_config_error_converts_to_configuration() {
        let err: SsrError = ConfigError::ValidationError("bad".to_string()).into();
        assert!(matches!(err, SsrError::Configuration(msg) if msg.contains("bad")));
    }
}
