// State container abstraction

use crate::error::Result;
use crate::request::SsrRequest;
use crate::routes::RouteMatch;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

/// Application state container.
pub trait Store: Send + Sync {
    /// Current state.
    fn get_state(&self) -> Value;
}

/// Creates one store per render.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    async fn create_store(
        &self,
        request: &dyn SsrRequest,
        route_match: &RouteMatch,
    ) -> Result<Arc<dyn Store>>;
}

/// A store whose state never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticStore {
    state: Value,
}

impl StaticStore {
    pub fn new(state: Value) -> Self {
        Self { state }
    }
}

impl Store for StaticStore {
    fn get_state(&self) -> Value {
        self.state.clone()
    }
}

struct FnStoreFactory<F>(F);

#[async_trait]
impl<F> StoreFactory for FnStoreFactory<F>
where
    F: for<'a> Fn(&'a dyn SsrRequest, &'a RouteMatch) -> BoxFuture<'a, Result<Arc<dyn Store>>>
        + Send
        + Sync,
{
    async fn create_store(
        &self,
        request: &dyn SsrRequest,
        route_match: &RouteMatch,
    ) -> Result<Arc<dyn Store>> {
        (self.0)(request, route_match).await
    }
}

/// Turn an async closure into a [`StoreFactory`].
///
/// ```
/// use armature_router_engine::{StaticStore, Store, store_factory_fn};
/// use futures_util::FutureExt;
/// use std::sync::Arc;
///
/// let factory = store_factory_fn(|_req, route| {
///     let state = serde_json::json!({ "path": route.pathname });
///     async move { Ok(Arc::new(StaticStore::new(state)) as Arc<dyn Store>) }.boxed()
/// });
/// # let _ = factory;
/// ```
pub fn store_factory_fn<F>(f: F) -> Arc<dyn StoreFactory>
where
    F: for<'a> Fn(&'a dyn SsrRequest, &'a RouteMatch) -> BoxFuture<'a, Result<Arc<dyn Store>>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnStoreFactory(f))
}

/// A factory that hands out the same state to every render.
pub fn static_store_factory(state: Value) -> Arc<dyn StoreFactory> {
    Arc::new(StaticStoreFactory { state })
}

struct StaticStoreFactory {
    state: Value,
}

#[async_trait]
impl StoreFactory for StaticStoreFactory {
    async fn create_store(
        &self,
        _request: &dyn SsrRequest,
        _route_match: &RouteMatch,
    ) -> Result<Arc<dyn Store>> {
        Ok(Arc::new(StaticStore::new(self.state.clone())))
    }
}
