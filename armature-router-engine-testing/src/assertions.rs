// Assertions for render results

use armature_router_engine::RenderResult;

/// Assert that a result has a specific status code
pub fn assert_status(result: &RenderResult, expected: u16) {
    assert_eq!(
        result.status(),
        expected,
        "Expected status {}, got {}: {:?}",
        expected,
        result.status(),
        result
    );
}

/// Assert a 200 result and return its markup and serialized state.
pub fn assert_rendered(result: &RenderResult) -> (&str, &str) {
    match result {
        RenderResult::Ok {
            markup,
            serialized_state,
        } => (markup.as_str(), serialized_state.as_str()),
        other => panic!("Expected a rendered result, got {:?}", other),
    }
}

/// Assert a 302 to `path`
pub fn assert_redirect(result: &RenderResult, path: &str) {
    assert_status(result, 302);
    assert_eq!(
        result.path(),
        Some(path),
        "Expected redirect to '{}', got {:?}",
        path,
        result.path()
    );
}

/// Assert a route-resolution 404 for `location`
pub fn assert_not_found(result: &RenderResult, location: &str) {
    let expected = format!("router-resolver: Path {} not found", location);
    assert_eq!(
        result,
        &RenderResult::NotFound { message: expected },
        "Expected not-found for '{}'",
        location
    );
}

/// Assert that the markup contains a string
pub fn assert_markup_contains(result: &RenderResult, expected: &str) {
    let (markup, _) = assert_rendered(result);
    assert!(
        markup.contains(expected),
        "Expected markup to contain '{}', but it didn't. Markup: {}",
        expected,
        markup
    );
}
