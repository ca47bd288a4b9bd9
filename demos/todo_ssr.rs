// Server-side rendering of a small todo app

use armature_router_engine::logging::{LogConfig, LogFormat, LogLevel};
use armature_router_engine::*;
use futures_util::FutureExt;
use serde_json::json;
use std::sync::Arc;

fn todo_list(cx: &ViewContext<'_>) -> Result<Element> {
    let todos = cx
        .state()
        .and_then(|state| state.get("todos"))
        .and_then(|todos| todos.as_array())
        .cloned()
        .unwrap_or_default();

    Ok(Element::node("section").attr("class", "todos").child(
        Element::node("ul").children(
            todos
                .iter()
                .map(|todo| Element::node("li").child(todo.as_str().unwrap_or_default().into())),
        ),
    ))
}

fn todo_detail(cx: &ViewContext<'_>) -> Result<Element> {
    let id = cx.param("id").unwrap_or_default();
    if id.parse::<usize>().is_err() {
        return Err(SsrError::not_found(format!("No todo with id {}", id)));
    }
    Ok(Element::node("article").child(Element::text(format!("Todo #{}", id))))
}

#[tokio::main]
async fn main() {
    LogConfig::new()
        .level(LogLevel::Debug)
        .format(LogFormat::Compact)
        .init();

    println!("🧭 Armature Router Engine Example");
    println!("=================================\n");

    let settings = match SettingsLoader::from_env(None) {
        Ok(settings) => settings,
        Err(e) => {
            println!("⚠️  Ignoring invalid environment settings: {}", e);
            EngineSettings::default()
        }
    };

    let routes = RouteTable::new()
        .route("/", view_fn(todo_list))
        .route("/todos/{id}", view_fn(todo_detail))
        .redirect("/home", "/");

    let engine = RenderEngine::builder()
        .route_table(RouteTable::new().nest("/app", routes))
        .create_store(store_factory_fn(|_req, route| {
            let state = json!({
                "todos": ["Use Redux", "Render on the server"],
                "route": route.pattern,
                "session": { "user": "demo" }
            });
            async move { Ok(Arc::new(StaticStore::new(state)) as Arc<dyn Store>) }.boxed()
        }))
        .filter_state(|mut state| {
            if let Some(map) = state.as_object_mut() {
                map.remove("session");
            }
            state
        })
        .component_wrapper(|factory, _req, _route, element| {
            factory.create(
                "div",
                vec![("id".to_string(), "root".to_string())],
                vec![element],
            )
        })
        .log_error(|req, error| {
            eprintln!("render error at {:?}: {}", req.path(), error);
        })
        .with_settings(&settings)
        .profile_render_time(true);

    let engine = match engine.build() {
        Ok(engine) => engine,
        Err(e) => {
            println!("❌ Failed to build engine: {}", e);
            return;
        }
    };

    for path in [
        "/app",
        "/app/todos/1",
        "/app/todos/abc",
        "/app/home?ref=nav",
        "/nowhere",
    ] {
        let result = engine.render(&RenderRequest::new(path), None).await;
        println!("{} -> {}", path, result.status());
        match &result {
            RenderResult::Ok {
                markup,
                serialized_state,
            } => {
                println!("  markup: {}", markup);
                println!("  state:  {}", serialized_state);
            }
            RenderResult::Redirect { path } => println!("  location: {}", path),
            other => println!("  message: {}", other.message().unwrap_or_default()),
        }
        println!();
    }
}
