//! Integration tests for armature-router-engine

use armature_router_engine::*;
use armature_router_engine_testing::*;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Arc;

fn engine_with(stores: &CountingStoreFactory) -> EngineBuilder {
    RenderEngine::builder()
        .route_table(todo_routes())
        .create_store(stores.shared())
}

fn default_engine() -> (RenderEngine, CountingStoreFactory) {
    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores).build().unwrap();
    (engine, stores)
}

// ============================================================================
// Outcome classification
// ============================================================================

#[tokio::test]
async fn test_matched_route_renders_markup_and_state() {
    let (engine, stores) = default_engine();

    let result = engine.render(&MockRequest::new("/test"), None).await;

    let (markup, serialized_state) = assert_rendered(&result);
    assert_eq!(
        markup,
        r#"<div class="todo-app"><ul><li>Use Redux</li></ul></div>"#
    );
    assert_eq!(
        serialized_state,
        r#"window.__PRELOADED_STATE__ = ["Use Redux"];"#
    );
    assert_eq!(stores.call_count(), 1);
    assert_eq!(stores.patterns(), vec!["/test".to_string()]);
}

#[tokio::test]
async fn test_unmatched_route_is_404_without_store() {
    let (engine, stores) = default_engine();

    let result = engine.render(&MockRequest::new("/test/blah"), None).await;

    assert_not_found(&result, "/test/blah");
    assert_eq!(stores.call_count(), 0);
}

#[tokio::test]
async fn test_redirect_rule_is_302_without_store_or_render() {
    let stores = CountingStoreFactory::new(todo_state());
    let renderer = StubRenderer::new("<stub/>");
    let engine = engine_with(&stores)
        .render_markup(renderer.shared())
        .build()
        .unwrap();

    let result = engine.render(&MockRequest::new("/test/source"), None).await;

    assert_eq!(
        result,
        RenderResult::Redirect {
            path: "/test/target".to_string()
        }
    );
    assert_eq!(stores.call_count(), 0);
    assert!(renderer.calls().is_empty());
}

#[tokio::test]
async fn test_location_falls_back_to_url_path() {
    let (engine, _) = default_engine();

    let result = engine
        .render(&MockRequest::with_url_path("/users/42"), None)
        .await;

    assert_markup_contains(&result, "<h1>user 42</h1>");
}

#[tokio::test]
async fn test_render_is_idempotent() {
    let (engine, _) = default_engine();
    let req = MockRequest::new("/test");

    let first = engine.render(&req, None).await;
    let second = engine.render(&req, None).await;

    assert_eq!(first, second);
}

// ============================================================================
// Options
// ============================================================================

#[tokio::test]
async fn test_with_ids_annotates_markup() {
    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores).with_ids(true).build().unwrap();

    let result = engine.render(&MockRequest::new("/test"), None).await;

    assert_markup_contains(&result, ROOT_ATTRIBUTE);
    assert_markup_contains(&result, r#"data-ssr-id="3""#);
}

#[tokio::test]
async fn test_call_options_override_with_ids() {
    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores).with_ids(true).build().unwrap();

    let result = engine
        .render(
            &MockRequest::new("/test"),
            Some(RenderOptions::new().with_ids(false)),
        )
        .await;

    let (markup, _) = assert_rendered(&result);
    assert!(!markup.contains(ID_ATTRIBUTE));
    assert!(engine.config().with_ids);
}

#[tokio::test]
async fn test_call_options_override_serializer_and_store() {
    let (engine, config_stores) = default_engine();
    let call_stores = CountingStoreFactory::new(json!(["Call store"]));

    let options = RenderOptions::new()
        .create_store(call_stores.shared())
        .stringify_snapshot(|state| format!("<!-- {} -->", state));
    let result = engine
        .render(&MockRequest::new("/test"), Some(options))
        .await;

    let (markup, serialized_state) = assert_rendered(&result);
    assert!(markup.contains("Call store"));
    assert_eq!(serialized_state, r#"<!-- ["Call store"] -->"#);
    assert_eq!(call_stores.call_count(), 1);
    assert_eq!(config_stores.call_count(), 0);
}

#[tokio::test]
async fn test_filter_state_removes_key_before_serialization() {
    let stores = CountingStoreFactory::new(session_state());

    let unfiltered = engine_with(&stores)
        .build()
        .unwrap()
        .render(&MockRequest::new("/test"), None)
        .await;
    let filtered = engine_with(&stores)
        .filter_state(|mut state| {
            if let Some(map) = state.as_object_mut() {
                map.remove("session");
            }
            state
        })
        .build()
        .unwrap()
        .render(&MockRequest::new("/test"), None)
        .await;

    assert!(assert_rendered(&unfiltered).1.contains("secret"));
    assert_eq!(
        assert_rendered(&filtered).1,
        r#"window.__PRELOADED_STATE__ = {"todos":["Use Redux"]};"#
    );
    // the view still sees the raw state
    assert_eq!(assert_rendered(&unfiltered).0, assert_rendered(&filtered).0);
}

#[tokio::test]
async fn test_component_wrapper_wraps_element() {
    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores)
        .component_wrapper(|factory, request, route_match, element| {
            let location = request.path().unwrap_or_default().to_string();
            factory.create(
                "main",
                vec![
                    ("data-route".to_string(), route_match.pattern.clone()),
                    ("data-location".to_string(), location),
                ],
                vec![element],
            )
        })
        .build()
        .unwrap();

    let result = engine.render(&MockRequest::new("/test"), None).await;

    let (markup, _) = assert_rendered(&result);
    assert!(markup.starts_with(r#"<main data-route="/test" data-location="/test"><div"#));
    assert!(markup.ends_with("</main>"));
}

#[tokio::test]
async fn test_custom_renderer_replaces_default() {
    let stores = CountingStoreFactory::new(todo_state());
    let renderer = StubRenderer::new("<stub/>");
    let engine = engine_with(&stores)
        .with_ids(true)
        .render_markup(renderer.shared())
        .build()
        .unwrap();

    let result = engine.render(&MockRequest::new("/test?tab=all"), None).await;

    assert_eq!(assert_rendered(&result).0, "<stub/>");
    assert_eq!(
        renderer.calls(),
        vec![RenderCall {
            with_ids: true,
            pattern: "/test".to_string(),
            location: "/test?tab=all".to_string(),
        }]
    );
    assert!(matches!(
        renderer.elements().as_slice(),
        [Element::Provider { .. }]
    ));
}

// ============================================================================
// Profiling
// ============================================================================

#[tokio::test]
async fn test_profiling_logs_once_on_match() {
    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores)
        .profile_render_time(true)
        .build()
        .unwrap();
    let req = MockRequest::new("/test");

    let result = engine.render(&req, None).await;

    assert_status(&result, 200);
    let logs = req.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].0, vec!["info", "logmon", "splunk", "perf"]);
    assert_eq!(logs[0].1["url"], "/test");
    assert!(logs[0].1["ssrtime"].is_number());
}

#[tokio::test]
async fn test_profiling_disabled_never_logs() {
    let (engine, _) = default_engine();
    let req = MockRequest::new("/test");

    engine.render(&req, None).await;

    assert_eq!(req.log_count(), 0);
}

#[tokio::test]
async fn test_profiling_skips_non_render_paths() {
    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores)
        .profile_render_time(true)
        .build()
        .unwrap();

    for path in ["/test/source", "/test/blah", "/error"] {
        let req = MockRequest::new(path);
        engine.render(&req, None).await;
        assert_eq!(req.log_count(), 0, "unexpected perf log for {}", path);
    }
}

#[tokio::test]
async fn test_profiling_via_request_logger() {
    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores).build().unwrap();
    let log = MemoryLog::new();
    let req = RenderRequest::new("/test").with_logger(Arc::new(log.clone()));

    engine
        .render(&req, Some(RenderOptions::new().profile_render_time(true)))
        .await;

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, PERF_LOG_TAGS.to_vec());
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_view_error_is_500_and_logged() {
    let stores = CountingStoreFactory::new(todo_state());
    let errors = ErrorRecorder::new();
    let engine = engine_with(&stores)
        .log_error(errors.hook())
        .build()
        .unwrap();

    let result = engine.render(&MockRequest::new("/error"), None).await;

    assert_eq!(
        result,
        RenderResult::Error {
            status: 500,
            message: "view failed".to_string(),
            path: None,
            original_error: SsrError::message("view failed"),
        }
    );
    assert_eq!(
        errors.errors(),
        vec![(Some("/error".to_string()), SsrError::message("view failed"))]
    );
}

#[tokio::test]
async fn test_view_signaled_redirect_is_honored() {
    let (engine, _) = default_engine();

    let result = engine.render(&MockRequest::new("/redirect-error"), None).await;

    assert_redirect(&result, "/x");
    assert_eq!(
        result.original_error(),
        Some(&SsrError::redirect("/x", "redirect with error"))
    );
}

#[tokio::test]
async fn test_view_signaled_not_found_is_honored() {
    let (engine, _) = default_engine();

    let result = engine.render(&MockRequest::new("/missing-error"), None).await;

    assert_status(&result, 404);
    assert_eq!(result.message(), Some("record not found"));
    assert!(result.original_error().is_some());
}

#[tokio::test]
async fn test_invalid_element_message_passes_through() {
    let (engine, _) = default_engine();

    let result = engine.render(&MockRequest::new("/invalid"), None).await;

    assert_status(&result, 500);
    assert!(result.message().unwrap().starts_with("Invalid element"));
    assert!(matches!(result.original_error(), Some(SsrError::Render(_))));
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let errors = ErrorRecorder::new();
    let engine = RenderEngine::builder()
        .route_table(todo_routes())
        .create_store(Arc::new(FailingStoreFactory::new("store unavailable")))
        .log_error(errors.hook())
        .build()
        .unwrap();
    let req = MockRequest::new("/test");

    let result = engine
        .render(&req, Some(RenderOptions::new().profile_render_time(true)))
        .await;

    assert_status(&result, 500);
    assert_eq!(result.message(), Some("store unavailable"));
    assert_eq!(errors.count(), 1);
    assert_eq!(req.log_count(), 0);
}

#[tokio::test]
async fn test_request_without_location_is_500() {
    let errors = ErrorRecorder::new();
    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores)
        .log_error(errors.hook())
        .build()
        .unwrap();

    let result = engine.render(&MockRequest::without_path(), None).await;

    assert_status(&result, 500);
    assert!(matches!(
        result.original_error(),
        Some(SsrError::Resolution(_))
    ));
    assert_eq!(errors.errors()[0].0, None);
}

struct FailingMatcher(SsrError);

#[async_trait]
impl RouteMatcher for FailingMatcher {
    async fn match_location(&self, _location: &str) -> Result<MatchOutcome> {
        Err(self.0.clone())
    }
}

#[tokio::test]
async fn test_matcher_failure_surfaces_as_result() {
    let engine = RenderEngine::builder()
        .routes(Arc::new(FailingMatcher(SsrError::Resolution(
            "matcher offline".to_string(),
        ))))
        .create_store(static_store_factory(Value::Null))
        .build()
        .unwrap();

    let result = engine.render(&MockRequest::new("/test"), None).await;
    assert_status(&result, 500);
    assert_eq!(result.message(), Some("matcher offline"));

    let engine = RenderEngine::builder()
        .routes(Arc::new(FailingMatcher(SsrError::with_status(
            503,
            "maintenance",
        ))))
        .create_store(static_store_factory(Value::Null))
        .build()
        .unwrap();

    let result = engine.render(&MockRequest::new("/test"), None).await;
    assert_status(&result, 503);
}

// ============================================================================
// Construction and configuration
// ============================================================================

#[test]
fn test_construction_requires_routes_and_store() {
    assert!(matches!(
        RenderEngine::builder()
            .create_store(static_store_factory(Value::Null))
            .build(),
        Err(SsrError::Configuration(_))
    ));
    assert!(matches!(
        RenderEngine::builder().route_table(todo_routes()).build(),
        Err(SsrError::Configuration(_))
    ));
}

#[tokio::test]
async fn test_settings_file_configures_engine() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "with_ids = true").unwrap();
    writeln!(file, "state_global = \"__APP__\"").unwrap();
    let settings = SettingsLoader::load_file(file.path()).unwrap();

    let stores = CountingStoreFactory::new(todo_state());
    let engine = engine_with(&stores).with_settings(&settings).build().unwrap();

    let result = engine.render(&MockRequest::new("/test"), None).await;
    let (markup, serialized_state) = assert_rendered(&result);
    assert!(markup.contains(ID_ATTRIBUTE));
    assert_eq!(serialized_state, r#"window.__APP__ = ["Use Redux"];"#);
}

#[test]
fn test_result_serializes_for_transport() {
    let result = RenderResult::Redirect {
        path: "/test/target".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"status": 302, "path": "/test/target"})
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_renders_are_independent() {
    let (engine, stores) = default_engine();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let req = MockRequest::new(&format!("/users/{}", i));
                let result = engine.render(&req, None).await;
                (i, result)
            })
        })
        .collect();

    for handle in handles {
        let (i, result) = handle.await.unwrap();
        assert_markup_contains(&result, &format!("<h1>user {}</h1>", i));
    }
    assert_eq!(stores.call_count(), 16);
}
