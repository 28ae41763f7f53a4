//! Descriptor resolution.
//!
//! Turns a stored [`MiddlewareSpec`] into a concrete middleware at dispatch
//! time. Resolution is pure with respect to the pipeline: the descriptor is
//! read, never rewritten, so a pipeline can in principle be inspected after
//! a dispatch and still show what was declared.

use crate::callbacks::{FunctionHandler, MethodHandler};
use cascade_core::{CascadeResult, Container, Middleware, MiddlewareSpec, RouteMatch};
use std::sync::Arc;

/// Resolves a descriptor into a concrete middleware.
///
/// # Errors
///
/// Returns [`CascadeError::Resolution`](cascade_core::CascadeError::Resolution)
/// when a named descriptor has no registration in the container.
pub fn resolve(spec: &MiddlewareSpec, container: &Container) -> CascadeResult<Arc<dyn Middleware>> {
    match spec {
        MiddlewareSpec::Named(name) => container.middleware(name),
        MiddlewareSpec::Instance(middleware) => Ok(Arc::clone(middleware)),
        MiddlewareSpec::Function(callback) => {
            Ok(Arc::new(FunctionHandler::new(Arc::clone(callback))))
        }
        MiddlewareSpec::Method { controller, action } => Ok(Arc::new(MethodHandler::new(
            Arc::clone(controller),
            action.clone(),
        ))),
    }
}

/// Resolves a matched route's handler descriptor, binding the route match
/// to the adapter so the target receives the extracted path parameters.
///
/// # Errors
///
/// As [`resolve`].
pub fn resolve_route_handler(
    spec: &MiddlewareSpec,
    container: &Container,
    route: &Arc<RouteMatch>,
) -> CascadeResult<Arc<dyn Middleware>> {
    match spec {
        MiddlewareSpec::Named(name) => container.middleware(name),
        MiddlewareSpec::Instance(middleware) => Ok(Arc::clone(middleware)),
        MiddlewareSpec::Function(callback) => Ok(Arc::new(FunctionHandler::for_route(
            Arc::clone(callback),
            Arc::clone(route),
        ))),
        MiddlewareSpec::Method { controller, action } => Ok(Arc::new(MethodHandler::for_route(
            Arc::clone(controller),
            action.clone(),
            Arc::clone(route),
        ))),
    }
}
