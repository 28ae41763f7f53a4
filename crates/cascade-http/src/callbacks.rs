//! Adapters turning callbacks and controller actions into middleware.
//!
//! Both adapters build a [`RouteContext`] for the wrapped target and apply
//! the [`Outcome`](cascade_core::Outcome) coercion policy to whatever it
//! returns. When the adapter was materialized from a matched route, the
//! route match is carried explicitly; otherwise it is recovered from the
//! request's extensions, so a callback used as plain pipeline middleware
//! still sees routing state if dispatch has reached it.

use cascade_core::{
    BoxFuture, CascadeResult, Controller, Handler, HandlerFn, Middleware, Request, Response,
    RouteContext, RouteMatch,
};
use std::sync::Arc;

/// Middleware wrapping a bare callback.
pub struct FunctionHandler {
    callback: Arc<HandlerFn>,
    route: Option<Arc<RouteMatch>>,
}

impl FunctionHandler {
    /// Wraps a callback used as ordinary pipeline middleware.
    #[must_use]
    pub fn new(callback: Arc<HandlerFn>) -> Self {
        Self {
            callback,
            route: None,
        }
    }

    /// Wraps a callback materialized from a matched route.
    #[must_use]
    pub fn for_route(callback: Arc<HandlerFn>, route: Arc<RouteMatch>) -> Self {
        Self {
            callback,
            route: Some(route),
        }
    }

    fn context(&self, request: Request) -> RouteContext {
        match &self.route {
            Some(route) => RouteContext::with_route(request, Arc::clone(route)),
            None => RouteContext::new(request),
        }
    }
}

impl Middleware for FunctionHandler {
    fn name(&self) -> &'static str {
        "function"
    }

    fn process<'a>(
        &'a self,
        request: Request,
        handler: &'a mut dyn Handler,
    ) -> BoxFuture<'a, CascadeResult<Response>> {
        Box::pin(async move {
            let cx = self.context(request);
            let outcome = (self.callback)(cx, handler).await?;
            Ok(outcome.into_response())
        })
    }
}

/// Middleware wrapping a controller action.
///
/// The action name is carried as data and dispatched by the controller at
/// call time; an unknown action surfaces as
/// [`CascadeError::InvalidRouteHandler`](cascade_core::CascadeError::InvalidRouteHandler)
/// from [`Controller::call`].
pub struct MethodHandler {
    controller: Arc<dyn Controller>,
    action: String,
    route: Option<Arc<RouteMatch>>,
}

impl MethodHandler {
    /// Wraps a controller action used as ordinary pipeline middleware.
    #[must_use]
    pub fn new(controller: Arc<dyn Controller>, action: impl Into<String>) -> Self {
        Self {
            controller,
            action: action.into(),
            route: None,
        }
    }

    /// Wraps a controller action materialized from a matched route.
    #[must_use]
    pub fn for_route(
        controller: Arc<dyn Controller>,
        action: impl Into<String>,
        route: Arc<RouteMatch>,
    ) -> Self {
        Self {
            controller,
            action: action.into(),
            route: Some(route),
        }
    }
}

impl Middleware for MethodHandler {
    fn name(&self) -> &'static str {
        "method"
    }

    fn process<'a>(
        &'a self,
        request: Request,
        handler: &'a mut dyn Handler,
    ) -> BoxFuture<'a, CascadeResult<Response>> {
        Box::pin(async move {
            let cx = match &self.route {
                Some(route) => RouteContext::with_route(request, Arc::clone(route)),
                None => RouteContext::new(request),
            };
            let outcome = self.controller.call(&self.action, cx, handler).await?;
            Ok(outcome.into_response())
        })
    }
}
