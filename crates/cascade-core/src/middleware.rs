//! Core middleware and handler traits.
//!
//! The dispatch chain is call-stack based: each middleware receives the
//! request together with a mutable handle on the dispatcher, and a
//! middleware that wants "downstream" behaviour calls back into
//! [`Handler::handle`] to continue the chain. The chain deep-dives through
//! async recursion and unwinds producing exactly one response.
//!
//! # Example
//!
//! ```ignore
//! use cascade_core::{BoxFuture, CascadeResult, Handler, Middleware, Request, Response};
//!
//! struct Logging;
//!
//! impl Middleware for Logging {
//!     fn name(&self) -> &'static str {
//!         "logging"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         request: Request,
//!         handler: &'a mut dyn Handler,
//!     ) -> BoxFuture<'a, CascadeResult<Response>> {
//!         Box::pin(async move {
//!             tracing::debug!(path = %request.uri().path(), "request in");
//!             let response = handler.handle(request).await?;
//!             tracing::debug!(status = %response.status(), "response out");
//!             Ok(response)
//!         })
//!     }
//! }
//! ```

use crate::error::CascadeResult;
use crate::outcome::Outcome;
use crate::spec::{MiddlewareSpec, RouteContext};
use crate::types::{Request, Response};
use crate::Container;
use std::future::Future;
use std::pin::Pin;

/// A boxed future, the return type of every chain step.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A unit of request-processing logic.
///
/// # Invariants
///
/// - A middleware that wants downstream behaviour MUST call
///   `handler.handle(request)` exactly once; not calling it short-circuits
///   the chain with this middleware's own response.
/// - A middleware MUST NOT swallow errors from downstream middleware.
pub trait Middleware: Send + Sync {
    /// Returns the name of this middleware, used for hooks and diagnostics.
    fn name(&self) -> &'static str;

    /// Processes the request through this middleware.
    fn process<'a>(
        &'a self,
        request: Request,
        handler: &'a mut dyn Handler,
    ) -> BoxFuture<'a, CascadeResult<Response>>;
}

/// The dispatcher-facing contract handed to every middleware.
///
/// Besides continuing the chain, a handler exposes the pipeline mutation
/// API: appending, inserting after the cursor, and bulk-splicing at the
/// cursor. All mutation validates descriptors and insertion positions and
/// fails without partial effects.
pub trait Handler: Send {
    /// Continues the dispatch chain with the given request.
    ///
    /// Re-entrant by design: middleware call back into this method to
    /// delegate downstream.
    fn handle<'a>(&'a mut self, request: Request) -> BoxFuture<'a, CascadeResult<Response>>;

    /// Appends a middleware descriptor to the end of the pipeline.
    fn push(&mut self, spec: MiddlewareSpec) -> CascadeResult<()>;

    /// Inserts a middleware descriptor immediately after the cursor, so it
    /// runs next once the current step delegates downstream.
    fn insert_next(&mut self, spec: MiddlewareSpec) -> CascadeResult<()>;

    /// Splices a batch of descriptors at the cursor, preserving the batch
    /// order. The batch runs before everything not yet dispatched.
    fn load(&mut self, batch: Vec<MiddlewareSpec>) -> CascadeResult<()>;

    /// Returns the dependency injection container.
    fn container(&self) -> &Container;
}

/// A receiver whose named actions can serve as route handlers.
///
/// This is the typed counterpart of a `[receiver, "method"]` descriptor
/// pair: the action is dispatched by name at call time, and an unrecognized
/// action must be rejected with
/// [`CascadeError::InvalidRouteHandler`](crate::CascadeError::InvalidRouteHandler).
pub trait Controller: Send + Sync {
    /// Returns the controller name, used for diagnostics.
    fn name(&self) -> &'static str;

    /// Invokes the named action.
    fn call<'a>(
        &'a self,
        action: &'a str,
        cx: RouteContext,
        handler: &'a mut dyn Handler,
    ) -> BoxFuture<'a, CascadeResult<Outcome>>;
}
