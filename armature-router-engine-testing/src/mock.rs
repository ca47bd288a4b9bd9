// Mock collaborators for render engine tests

use armature_router_engine::{
    Element, MarkupRenderer, RenderInput, RequestLog, Result, RouteMatch, SsrError, SsrRequest,
    StaticStore, Store, StoreFactory,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A logged request entry: tags and payload.
pub type LogEntry = (Vec<String>, Value);

/// Request that records every `log` call.
#[derive(Clone, Default)]
pub struct MockRequest {
    path: Option<String>,
    url_path: Option<String>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl MockRequest {
    /// Create a request with `path` set.
    pub fn new(path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            ..Self::default()
        }
    }

    /// Create a request that only has `url.path` set.
    pub fn with_url_path(url_path: &str) -> Self {
        Self {
            url_path: Some(url_path.to_string()),
            ..Self::default()
        }
    }

    /// A request with neither `path` nor `url.path`.
    pub fn without_path() -> Self {
        Self::default()
    }

    /// Get all recorded log entries
    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.lock().unwrap().clone()
    }

    /// Get the number of log calls
    pub fn log_count(&self) -> usize {
        self.logs.lock().unwrap().len()
    }
}

impl SsrRequest for MockRequest {
    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn url_path(&self) -> Option<&str> {
        self.url_path.as_deref()
    }

    fn log(&self, tags: &[&str], payload: Value) {
        let tags = tags.iter().map(|tag| tag.to_string()).collect();
        self.logs.lock().unwrap().push((tags, payload));
    }
}

/// A [`RequestLog`] sink that keeps entries in memory.
#[derive(Clone, Default)]
pub struct MemoryLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl RequestLog for MemoryLog {
    fn log(&self, tags: &[&str], payload: &Value) {
        let tags = tags.iter().map(|tag| tag.to_string()).collect();
        self.entries.lock().unwrap().push((tags, payload.clone()));
    }
}

/// Store factory that counts invocations and records matched patterns.
#[derive(Clone)]
pub struct CountingStoreFactory {
    state: Value,
    calls: Arc<AtomicUsize>,
    patterns: Arc<Mutex<Vec<String>>>,
}

impl CountingStoreFactory {
    pub fn new(state: Value) -> Self {
        Self {
            state,
            calls: Arc::new(AtomicUsize::new(0)),
            patterns: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of stores created
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Patterns of the routes stores were created for
    pub fn patterns(&self) -> Vec<String> {
        self.patterns.lock().unwrap().clone()
    }

    /// Share as a trait object, keeping this handle for assertions.
    pub fn shared(&self) -> Arc<dyn StoreFactory> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl StoreFactory for CountingStoreFactory {
    async fn create_store(
        &self,
        _request: &dyn SsrRequest,
        route_match: &RouteMatch,
    ) -> Result<Arc<dyn Store>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.patterns
            .lock()
            .unwrap()
            .push(route_match.pattern.clone());
        Ok(Arc::new(StaticStore::new(self.state.clone())))
    }
}

/// Store factory that always fails.
#[derive(Debug, Clone)]
pub struct FailingStoreFactory {
    error: SsrError,
}

impl FailingStoreFactory {
    pub fn new(message: &str) -> Self {
        Self {
            error: SsrError::StoreCreation(message.to_string()),
        }
    }

    pub fn with_error(error: SsrError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl StoreFactory for FailingStoreFactory {
    async fn create_store(
        &self,
        _request: &dyn SsrRequest,
        _route_match: &RouteMatch,
    ) -> Result<Arc<dyn Store>> {
        tokio::task::yield_now().await;
        Err(self.error.clone())
    }
}

/// What a [`StubRenderer`] saw for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCall {
    pub with_ids: bool,
    pub pattern: String,
    pub location: String,
}

/// Renderer that returns fixed markup and records its inputs.
#[derive(Clone)]
pub struct StubRenderer {
    markup: String,
    calls: Arc<Mutex<Vec<RenderCall>>>,
    elements: Arc<Mutex<Vec<Element>>>,
}

impl StubRenderer {
    pub fn new(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            elements: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Elements handed to the renderer, in call order.
    pub fn elements(&self) -> Vec<Element> {
        self.elements.lock().unwrap().clone()
    }

    pub fn shared(&self) -> Arc<dyn MarkupRenderer> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl MarkupRenderer for StubRenderer {
    async fn render_markup(&self, input: RenderInput<'_>) -> Result<String> {
        tokio::task::yield_now().await;
        self.calls.lock().unwrap().push(RenderCall {
            with_ids: input.with_ids,
            pattern: input.route_match.pattern.clone(),
            location: input.route_match.location.clone(),
        });
        self.elements.lock().unwrap().push(input.element);
        Ok(self.markup.clone())
    }
}

/// Collects every error passed to the engine's `log_error` hook.
#[derive(Clone, Default)]
pub struct ErrorRecorder {
    errors: Arc<Mutex<Vec<(Option<String>, SsrError)>>>,
}

impl ErrorRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `log_error` hook feeding this recorder.
    pub fn hook(&self) -> impl Fn(&dyn SsrRequest, &SsrError) + Send + Sync + 'static {
        let errors = self.errors.clone();
        move |request: &dyn SsrRequest, error: &SsrError| {
            let location = request
                .path()
                .or_else(|| request.url_path())
                .map(str::to_string);
            errors.lock().unwrap().push((location, error.clone()));
        }
    }

    /// Recorded errors with the location of the failing request
    pub fn errors(&self) -> Vec<(Option<String>, SsrError)> {
        self.errors.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_request_records_logs() {
        let req = MockRequest::new("/a");
        req.log(&["info", "perf"], serde_json::json!({"x": 1}));

        assert_eq!(req.log_count(), 1);
        assert_eq!(req.logs()[0].0, vec!["info", "perf"]);
        assert_eq!(req.path(), Some("/a"));
        assert_eq!(req.url_path(), None);
    }

    #[test]
    fn test_clones_share_logs() {
        let req = MockRequest::with_url_path("/b");
        let clone = req.clone();
        clone.log(&["debug"], Value::Null);
        assert_eq!(req.log_count(), 1);
    }

    #[test]
    fn test_error_recorder_hook() {
        let recorder = ErrorRecorder::new();
        let hook = recorder.hook();
        hook(&MockRequest::new("/c"), &SsrError::Render("bad".to_string()));

        assert_eq!(recorder.count(), 1);
        assert_eq!(recorder.errors()[0].0.as_deref(), Some("/c"));
    }
}
