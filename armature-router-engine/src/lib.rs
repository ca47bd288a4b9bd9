//! Server-side render engine for Armature.
//!
//! Given a request path, the engine resolves it against a route table,
//! creates the application store for the matched route, renders the view
//! tree to markup, and returns a [`RenderResult`] with the status code, the
//! markup and the serialized state a client needs to hydrate. Transport
//! layers only need to implement [`SsrRequest`] and map the result onto a
//! response.
//!
//! ## Features
//!
//! - 🧭 **Route resolution** - `matchit`-backed route tables with redirects
//! - 🗄️ **Store bootstrap** - one store per render, optional state filtering
//! - 🖨️ **Markup rendering** - compact or id-annotated HTML, or your own renderer
//! - ⏱️ **Profiling** - optional render-time log entry per request
//! - 🛡️ **Uniform errors** - every failure becomes a status-coded result
//!
//! ## Quick Start
//!
//! ```
//! use armature_router_engine::*;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let engine = RenderEngine::builder()
//!     .route_table(
//!         RouteTable::new()
//!             .route("/test", view_fn(|cx| {
//!                 let todos = cx.state().cloned().unwrap_or_default();
//!                 Ok(Element::node("ul").child(Element::text(todos.to_string())))
//!             }))
//!             .redirect("/test/source", "/test/target"),
//!     )
//!     .create_store(static_store_factory(json!(["Use Redux"])))
//!     .build()
//!     .unwrap();
//!
//! let result = engine.render(&RenderRequest::new("/test"), None).await;
//! assert_eq!(result.status(), 200);
//! assert_eq!(
//!     result.serialized_state(),
//!     Some(r#"window.__PRELOADED_STATE__ = ["Use Redux"];"#)
//! );
//!
//! let result = engine.render(&RenderRequest::new("/test/source"), None).await;
//! assert_eq!(result.status(), 302);
//! assert_eq!(result.path(), Some("/test/target"));
//!
//! let result = engine.render(&RenderRequest::new("/test/blah"), None).await;
//! assert_eq!(result.status(), 404);
//! # });
//! ```
//!
//! ## Per-call Options
//!
//! ```
//! use armature_router_engine::RenderOptions;
//!
//! // Identifiers off and profiling on for this call only
//! let options = RenderOptions::new().with_ids(false).profile_render_time(true);
//! assert_eq!(options.with_ids, Some(false));
//! assert!(options.create_store.is_none());
//! ```
//!
//! ## Signaling Outcomes from Views
//!
//! A view can end the render with a specific status by returning an error
//! that carries one:
//!
//! ```
//! use armature_router_engine::{SsrError, view_fn};
//!
//! let members_only = view_fn(|cx| {
//!     if cx.state().and_then(|s| s.get("user")).is_none() {
//!         return Err(SsrError::redirect("/login", "login required"));
//!     }
//!     Ok("welcome".into())
//! });
//! # let _ = members_only;
//! ```

mod config;
mod element;
mod engine;
mod error;
pub mod logging;
mod options;
mod renderer;
mod request;
mod resolver;
mod result;
mod routes;
mod settings;
mod store;

pub use config::{
    ComponentWrapper, DEFAULT_STATE_GLOBAL, EngineBuilder, EngineConfig, ErrorLogger,
    SnapshotSerializer, StateFilter, default_stringify_snapshot, script_safe_json,
    stringify_with_global,
};
pub use element::{Element, ElementFactory, View, ViewContext, view_fn};
pub use engine::{PERF_LOG_TAGS, RenderEngine};
pub use error::{ConfigError, Result, SsrError};
pub use logging::TracingRequestLog;
pub use options::{EffectiveOptions, RenderOptions};
pub use renderer::{HtmlRenderer, ID_ATTRIBUTE, MarkupRenderer, ROOT_ATTRIBUTE, RenderInput};
pub use request::{RenderRequest, RequestLog, RequestUrl, SsrRequest, location_of};
pub use resolver::resolve;
pub use result::RenderResult;
pub use routes::{CompiledRoutes, MatchOutcome, RouteMatch, RouteMatcher, RouteTable};
pub use settings::{DEFAULT_ENV_PREFIX, EngineSettings, FileFormat, SettingsLoader, Validate};
pub use store::{StaticStore, Store, StoreFactory, static_store_factory, store_factory_fn};
