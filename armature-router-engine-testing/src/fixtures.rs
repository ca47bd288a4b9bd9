// Route fixtures shared by engine tests

use armature_router_engine::{Element, RouteTable, SsrError, view_fn};
use serde_json::{Value, json};

/// State of the todo fixture store.
pub fn todo_state() -> Value {
    json!(["Use Redux"])
}

/// State with a key that filters are expected to remove.
pub fn session_state() -> Value {
    json!({
        "todos": ["Use Redux"],
        "session": { "token": "secret" }
    })
}

/// Route table used across engine tests.
///
/// - `/test` renders the todo list from the store state
/// - `/test/source` redirects to `/test/target`
/// - `/users/{id}` renders the `id` parameter
/// - `/error` fails with a plain error
/// - `/redirect-error` fails with a 302 to `/x`
/// - `/missing-error` fails with a 404
/// - `/invalid` produces an element with an empty tag
pub fn todo_routes() -> RouteTable {
    RouteTable::new()
        .route(
            "/test",
            view_fn(|cx| {
                let todos = cx
                    .state()
                    .and_then(|state| {
                        state
                            .as_array()
                            .or_else(|| state.get("todos").and_then(Value::as_array))
                    })
                    .cloned()
                    .unwrap_or_default();

                let items = todos.iter().map(|todo| {
                    Element::node("li").child(Element::text(todo.as_str().unwrap_or_default()))
                });
                Ok(Element::node("div")
                    .attr("class", "todo-app")
                    .child(Element::node("ul").children(items)))
            }),
        )
        .redirect("/test/source", "/test/target")
        .route(
            "/users/{id}",
            view_fn(|cx| {
                Ok(Element::node("h1").child(Element::text(format!(
                    "user {}",
                    cx.param("id").unwrap_or_default()
                ))))
            }),
        )
        .route("/error", view_fn(|_| Err(SsrError::message("view failed"))))
        .route(
            "/redirect-error",
            view_fn(|_| Err(SsrError::redirect("/x", "redirect with error"))),
        )
        .route(
            "/missing-error",
            view_fn(|_| Err(SsrError::not_found("record not found"))),
        )
        .route("/invalid", view_fn(|_| Ok(Element::node(""))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_router_engine::MatchOutcome;

    #[test]
    fn test_fixture_table_compiles() {
        let routes = todo_routes().build().unwrap();
        assert!(matches!(routes.resolve("/test"), MatchOutcome::Matched(_)));
        assert!(matches!(
            routes.resolve("/test/source"),
            MatchOutcome::Redirect(_)
        ));
        assert!(matches!(routes.resolve("/test/blah"), MatchOutcome::NotFound));
    }
}
