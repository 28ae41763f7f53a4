//! Observability hooks for the dispatch loop.
//!
//! The dispatch loop exposes exactly two hook points, called synchronously:
//! one when a middleware is about to be invoked, one when a dispatch fails.
//! The failure hook fires exactly once per failure, before the error
//! propagates unchanged to the caller; the core never swallows errors, it
//! only observes them.

use crate::error::CascadeError;
use crate::types::RequestId;
use http::{Method, Uri};

/// Hook interface called by the dispatch loop.
pub trait DispatchHooks: Send + Sync {
    /// Called after a middleware has been resolved, immediately before it
    /// is invoked.
    fn middleware_loaded(&self, request_id: RequestId, name: &str) {
        let _ = (request_id, name);
    }

    /// Called once when a dispatch fails, before the error is rethrown.
    fn request_failed(&self, request_id: RequestId, error: &CascadeError, method: &Method, uri: &Uri) {
        let _ = (request_id, error, method, uri);
    }
}

/// Hooks that log through [`tracing`]. The default for request handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl DispatchHooks for TracingHooks {
    fn middleware_loaded(&self, request_id: RequestId, name: &str) {
        tracing::debug!(request_id = %request_id, middleware = name, "middleware loaded");
    }

    fn request_failed(&self, request_id: RequestId, error: &CascadeError, method: &Method, uri: &Uri) {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            path = %uri.path(),
            error = %error,
            "request failed"
        );
    }
}

/// Hooks that do nothing, for embedding the dispatcher without telemetry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHooks;

impl DispatchHooks for NullHooks {}
