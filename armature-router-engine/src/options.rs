// Per-call render options

use crate::config::{EngineConfig, SnapshotSerializer, StateFilter};
use crate::store::StoreFactory;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Overrides for a single [`render`](crate::RenderEngine::render) call.
///
/// Unset fields fall back to the engine configuration.
#[derive(Clone, Default)]
pub struct RenderOptions {
    pub with_ids: Option<bool>,
    pub profile_render_time: Option<bool>,
    pub stringify_snapshot: Option<SnapshotSerializer>,
    pub create_store: Option<Arc<dyn StoreFactory>>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(mut self, enabled: bool) -> Self {
        self.with_ids = Some(enabled);
        self
    }

    pub fn profile_render_time(mut self, enabled: bool) -> Self {
        self.profile_render_time = Some(enabled);
        self
    }

    pub fn stringify_snapshot<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.stringify_snapshot = Some(Arc::new(serializer));
        self
    }

    pub fn create_store(mut self, factory: Arc<dyn StoreFactory>) -> Self {
        self.create_store = Some(factory);
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("with_ids", &self.with_ids)
            .field("profile_render_time", &self.profile_render_time)
            .field("stringify_snapshot", &self.stringify_snapshot.is_some())
            .field("create_store", &self.create_store.is_some())
            .finish()
    }
}

/// The options one render actually runs with.
#[derive(Clone)]
pub struct EffectiveOptions {
    pub with_ids: bool,
    pub profile_render_time: bool,
    pub filter_state: Option<StateFilter>,
    pub stringify_snapshot: SnapshotSerializer,
    pub create_store: Arc<dyn StoreFactory>,
}

impl EffectiveOptions {
    /// Merge call options over the configuration. Call options win.
    pub fn merge(config: &EngineConfig, options: Option<&RenderOptions>) -> Self {
        let defaults = RenderOptions::default();
        let options = options.unwrap_or(&defaults);

        Self {
            with_ids: options.with_ids.unwrap_or(config.with_ids),
            profile_render_time: options
                .profile_render_time
                .unwrap_or(config.profile_render_time),
            filter_state: config.filter_state.clone(),
            stringify_snapshot: options
                .stringify_snapshot
                .clone()
                .unwrap_or_else(|| config.stringify_snapshot.clone()),
            create_store: options
                .create_store
                .clone()
                .unwrap_or_else(|| config.create_store.clone()),
        }
    }
}
