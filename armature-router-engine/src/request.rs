// Request abstraction consumed by the render engine

use crate::error::{Result, SsrError};
use crate::logging::TracingRequestLog;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// What the engine needs from an incoming request.
///
/// Transport layers implement this for their own request type. The location
/// is read from [`path`](SsrRequest::path) first and falls back to
/// [`url_path`](SsrRequest::url_path).
pub trait SsrRequest: Send + Sync {
    /// Request path, including any query string.
    fn path(&self) -> Option<&str>;

    /// Path of the parsed request URL, if the transport keeps one.
    fn url_path(&self) -> Option<&str> {
        None
    }

    /// Emit a tagged log entry scoped to this request.
    fn log(&self, tags: &[&str], payload: Value);
}

/// Sink for request-scoped log entries.
pub trait RequestLog: Send + Sync {
    fn log(&self, tags: &[&str], payload: &Value);
}

/// Parsed request URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestUrl {
    pub path: String,
}

/// A ready-made [`SsrRequest`] for callers that have no request type of their own.
#[derive(Clone)]
pub struct RenderRequest {
    pub path: Option<String>,
    pub url: Option<RequestUrl>,
    logger: Arc<dyn RequestLog>,
}

impl RenderRequest {
    /// Create a request for the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            url: None,
            logger: Arc::new(TracingRequestLog),
        }
    }

    /// Create a request that only carries a parsed URL.
    pub fn from_url(url_path: impl Into<String>) -> Self {
        Self {
            path: None,
            url: Some(RequestUrl {
                path: url_path.into(),
            }),
            logger: Arc::new(TracingRequestLog),
        }
    }

    /// Set the parsed URL.
    pub fn with_url(mut self, url_path: impl Into<String>) -> Self {
        self.url = Some(RequestUrl {
            path: url_path.into(),
        });
        self
    }

    /// Route request logs to a custom sink.
    pub fn with_logger(mut self, logger: Arc<dyn RequestLog>) -> Self {
        self.logger = logger;
        self
    }
}

impl fmt::Debug for RenderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderRequest")
            .field("path", &self.path)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl SsrRequest for RenderRequest {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn url_path(&self) -> Option<&str> {
        self.url.as_ref().map(|url| url.path.as_str())
    }

    fn log(&self, tags: &[&str], payload: Value) {
        self.logger.log(tags, &payload);
    }
}

/// Extract the location to route: `path`, then `url.path`.
pub fn location_of(request: &dyn SsrRequest) -> Result<String> {
    request
        .path()
        .or_else(|| request.url_path())
        .map(str::to_string)
        .ok_or_else(|| SsrError::Resolution("router-resolver: request has no path".to_string()))
}
