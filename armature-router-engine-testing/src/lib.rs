//! Testing utilities for `armature-router-engine`.
//!
//! ## Features
//!
//! - 🎭 **MockRequest** - Request that records its log calls
//! - 🗄️ **Store factories** - Counting and failing store factories
//! - 🖨️ **StubRenderer** - Fixed-markup renderer that records its inputs
//! - 🧾 **ErrorRecorder** - Captures `log_error` hook calls
//! - 🧭 **Fixtures** - A todo route table covering every outcome
//! - ✅ **Assertions** - Status, redirect, not-found and markup checks
//!
//! ## Quick Start
//!
//! ```
//! use armature_router_engine::RenderEngine;
//! use armature_router_engine_testing::*;
//!
//! # tokio_test::block_on(async {
//! let stores = CountingStoreFactory::new(todo_state());
//! let engine = RenderEngine::builder()
//!     .route_table(todo_routes())
//!     .create_store(stores.shared())
//!     .build()
//!     .unwrap();
//!
//! let result = engine.render(&MockRequest::new("/test/blah"), None).await;
//! assert_not_found(&result, "/test/blah");
//! assert_eq!(stores.call_count(), 0);
//! # });
//! ```

mod assertions;
mod fixtures;
mod mock;

pub use assertions::{
    assert_markup_contains, assert_not_found, assert_redirect, assert_rendered, assert_status,
};
pub use fixtures::{session_state, todo_routes, todo_state};
pub use mock::{
    CountingStoreFactory, ErrorRecorder, FailingStoreFactory, LogEntry, MemoryLog, MockRequest,
    RenderCall, StubRenderer,
};
