// Render orchestration

use crate::config::{EngineBuilder, EngineConfig};
use crate::element::{Element, ElementFactory};
use crate::error::Result;
use crate::options::{EffectiveOptions, RenderOptions};
use crate::renderer::{HtmlRenderer, MarkupRenderer, RenderInput};
use crate::request::SsrRequest;
use crate::resolver::resolve;
use crate::result::RenderResult;
use crate::routes::{MatchOutcome, RouteMatch};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Tags of the render-time log entry.
pub const PERF_LOG_TAGS: [&str; 4] = ["info", "logmon", "splunk", "perf"];

/// Server-side render engine.
///
/// Cheap to clone; clones share the same immutable configuration and can
/// render concurrently.
#[derive(Clone, Debug)]
pub struct RenderEngine {
    config: Arc<EngineConfig>,
}

impl RenderEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render the request.
    ///
    /// Always resolves to a [`RenderResult`]; failures are reported to the
    /// `log_error` hook and returned as [`RenderResult::Error`].
    pub async fn render(
        &self,
        request: &dyn SsrRequest,
        options: Option<RenderOptions>,
    ) -> RenderResult {
        match self.try_render(request, options.as_ref()).await {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(
                    status = error.status_code(),
                    error = %error,
                    "Render failed"
                );
                (self.config.log_error)(request, &error);
                RenderResult::from_error(error)
            }
        }
    }

    async fn try_render(
        &self,
        request: &dyn SsrRequest,
        options: Option<&RenderOptions>,
    ) -> Result<RenderResult> {
        let (location, outcome) = resolve(self.config.routes.as_ref(), request).await?;

        match outcome {
            MatchOutcome::Redirect(path) => {
                tracing::debug!(location = %location, target = %path, "Route redirect");
                Ok(RenderResult::Redirect { path })
            }
            MatchOutcome::NotFound => {
                tracing::debug!(location = %location, "Route not found");
                Ok(RenderResult::NotFound {
                    message: format!("router-resolver: Path {} not found", location),
                })
            }
            MatchOutcome::Matched(route_match) => {
                let options = EffectiveOptions::merge(&self.config, options);
                self.render_match(request, &location, route_match, options)
                    .await
            }
        }
    }

    async fn render_match(
        &self,
        request: &dyn SsrRequest,
        location: &str,
        route_match: RouteMatch,
        options: EffectiveOptions,
    ) -> Result<RenderResult> {
        let store = options
            .create_store
            .create_store(request, &route_match)
            .await?;

        let started = options.profile_render_time.then(Instant::now);

        let mut element = Element::provider(store.clone(), Element::Router(route_match.clone()));
        if let Some(wrapper) = &self.config.component_wrapper {
            element = wrapper(&ElementFactory, request, &route_match, element);
        }

        let input = RenderInput {
            element,
            with_ids: options.with_ids,
            request,
            route_match: &route_match,
        };
        let markup = match &self.config.render_markup {
            Some(renderer) => renderer.render_markup(input).await?,
            None => HtmlRenderer.render_markup(input).await?,
        };

        if let Some(started) = started {
            let elapsed = started.elapsed();
            let ssrtime =
                elapsed.as_secs() as f64 * 1000.0 + f64::from(elapsed.subsec_nanos()) / 1_000_000.0;
            request.log(&PERF_LOG_TAGS, json!({ "url": location, "ssrtime": ssrtime }));
        }

        let state = store.get_state();
        let snapshot = match &options.filter_state {
            Some(filter) => filter(state),
            None => state,
        };
        let serialized_state = (options.stringify_snapshot)(&snapshot);

        tracing::debug!(location = %location, pattern = %route_match.pattern, "Rendered route");

        Ok(RenderResult::Ok {
            markup,
            serialized_state,
        })
    }
}
