// Render engine configuration

use crate::element::{Element, ElementFactory};
use crate::engine::RenderEngine;
use crate::error::{Result, SsrError};
use crate::renderer::MarkupRenderer;
use crate::request::SsrRequest;
use crate::routes::{RouteMatch, RouteMatcher, RouteTable};
use crate::settings::EngineSettings;
use crate::store::StoreFactory;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Serializes the state snapshot into the markup bootstrap.
pub type SnapshotSerializer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Rewrites the raw store state before serialization.
pub type StateFilter = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Called with every error caught by the engine.
pub type ErrorLogger = Arc<dyn Fn(&dyn SsrRequest, &SsrError) + Send + Sync>;

/// Wraps the composed element before rendering.
pub type ComponentWrapper =
    Arc<dyn Fn(&ElementFactory, &dyn SsrRequest, &RouteMatch, Element) -> Element + Send + Sync>;

/// Global the default serializer assigns the state to.
pub const DEFAULT_STATE_GLOBAL: &str = "__PRELOADED_STATE__";

/// Immutable engine configuration. Build one with [`EngineBuilder`].
#[derive(Clone)]
pub struct EngineConfig {
    pub routes: Arc<dyn RouteMatcher>,
    pub create_store: Arc<dyn StoreFactory>,
    pub stringify_snapshot: SnapshotSerializer,
    pub log_error: ErrorLogger,
    pub with_ids: bool,
    pub profile_render_time: bool,
    pub filter_state: Option<StateFilter>,
    pub component_wrapper: Option<ComponentWrapper>,
    pub render_markup: Option<Arc<dyn MarkupRenderer>>,
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("with_ids", &self.with_ids)
            .field("profile_render_time", &self.profile_render_time)
            .field("filter_state", &self.filter_state.is_some())
            .field("component_wrapper", &self.component_wrapper.is_some())
            .field("render_markup", &self.render_markup.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RenderEngine`].
///
/// `routes` (or `route_table`) and `create_store` are required; everything
/// else has a default.
#[derive(Default)]
pub struct EngineBuilder {
    routes: Option<Arc<dyn RouteMatcher>>,
    route_table: Option<RouteTable>,
    create_store: Option<Arc<dyn StoreFactory>>,
    stringify_snapshot: Option<SnapshotSerializer>,
    log_error: Option<ErrorLogger>,
    with_ids: bool,
    profile_render_time: bool,
    filter_state: Option<StateFilter>,
    component_wrapper: Option<ComponentWrapper>,
    render_markup: Option<Arc<dyn MarkupRenderer>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom route matcher.
    pub fn routes(mut self, routes: Arc<dyn RouteMatcher>) -> Self {
        self.routes = Some(routes);
        self.route_table = None;
        self
    }

    /// Use a declarative route table, compiled when the engine is built.
    pub fn route_table(mut self, table: RouteTable) -> Self {
        self.route_table = Some(table);
        self.routes = None;
        self
    }

    pub fn create_store(mut self, factory: Arc<dyn StoreFactory>) -> Self {
        self.create_store = Some(factory);
        self
    }

    pub fn stringify_snapshot<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.stringify_snapshot = Some(Arc::new(serializer));
        self
    }

    pub fn log_error<F>(mut self, logger: F) -> Self
    where
        F: Fn(&dyn SsrRequest, &SsrError) + Send + Sync + 'static,
    {
        self.log_error = Some(Arc::new(logger));
        self
    }

    pub fn with_ids(mut self, enabled: bool) -> Self {
        self.with_ids = enabled;
        self
    }

    pub fn profile_render_time(mut self, enabled: bool) -> Self {
        self.profile_render_time = enabled;
        self
    }

    pub fn filter_state<F>(mut self, filter: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.filter_state = Some(Arc::new(filter));
        self
    }

    pub fn component_wrapper<F>(mut self, wrapper: F) -> Self
    where
        F: Fn(&ElementFactory, &dyn SsrRequest, &RouteMatch, Element) -> Element
            + Send
            + Sync
            + 'static,
    {
        self.component_wrapper = Some(Arc::new(wrapper));
        self
    }

    /// Replace the default renderer entirely.
    pub fn render_markup(mut self, renderer: Arc<dyn MarkupRenderer>) -> Self {
        self.render_markup = Some(renderer);
        self
    }

    /// Apply file or environment settings.
    pub fn with_settings(mut self, settings: &EngineSettings) -> Self {
        self.with_ids = settings.with_ids;
        self.profile_render_time = settings.profile_render_time;
        if settings.state_global != DEFAULT_STATE_GLOBAL {
            self.stringify_snapshot = Some(stringify_with_global(&settings.state_global));
        }
        self
    }

    /// Validate and normalize the configuration.
    pub fn build_config(self) -> Result<EngineConfig> {
        let routes = match (self.routes, self.route_table) {
            (Some(routes), _) => routes,
            (None, Some(table)) => Arc::new(table.build()?),
            (None, None) => {
                return Err(SsrError::Configuration(
                    "router-engine: routes is required".to_string(),
                ));
            }
        };

        let create_store = self.create_store.ok_or_else(|| {
            SsrError::Configuration("router-engine: create_store is required".to_string())
        })?;

        Ok(EngineConfig {
            routes,
            create_store,
            stringify_snapshot: self
                .stringify_snapshot
                .unwrap_or_else(|| Arc::new(default_stringify_snapshot)),
            log_error: self.log_error.unwrap_or_else(|| Arc::new(ignore_error)),
            with_ids: self.with_ids,
            profile_render_time: self.profile_render_time,
            filter_state: self.filter_state,
            component_wrapper: self.component_wrapper,
            render_markup: self.render_markup,
        })
    }

    /// Build the engine. Fails if `routes` or `create_store` is missing.
    pub fn build(self) -> Result<RenderEngine> {
        Ok(RenderEngine::new(self.build_config()?))
    }
}

fn ignore_error(_request: &dyn SsrRequest, _error: &SsrError) {}

/// `window.__PRELOADED_STATE__ = <json>;`
pub fn default_stringify_snapshot(state: &Value) -> String {
    assign_global(DEFAULT_STATE_GLOBAL, state)
}

/// Same as [`default_stringify_snapshot`] with a different global.
pub fn stringify_with_global(global: &str) -> SnapshotSerializer {
    let global = global.to_string();
    Arc::new(move |state: &Value| assign_global(&global, state))
}

fn assign_global(global: &str, state: &Value) -> String {
    format!("window.{} = {};", global, script_safe_json(state))
}

/// Compact JSON with `<`, `>`, `&`, U+2028 and U+2029 escaped so the output
/// can sit inside a `<script>` element.
pub fn script_safe_json(state: &Value) -> String {
    let json = state.to_string();
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
