//! Middleware descriptors and the callback context.
//!
//! A [`MiddlewareSpec`] is the stored form of "something that can become a
//! middleware": a registry name, a built instance, a callback, or a
//! controller action. Classification happens at the call site that creates
//! the spec, never by later introspection; a spec is immutable once stored
//! in a pipeline, and resolving it never mutates it.

use crate::error::{CascadeError, CascadeResult};
use crate::middleware::{BoxFuture, Controller, Handler, Middleware};
use crate::outcome::Outcome;
use crate::route::{PathParams, RouteMatch};
use crate::types::Request;
use std::fmt;
use std::sync::Arc;

/// The callback type behind [`MiddlewareSpec::Function`].
///
/// Callbacks receive an owned [`RouteContext`] (request plus optional route
/// match) and a mutable handle on the dispatcher, and return an [`Outcome`]
/// subject to the coercion policy.
pub type HandlerFn = dyn for<'a> Fn(RouteContext, &'a mut dyn Handler) -> BoxFuture<'a, CascadeResult<Outcome>>
    + Send
    + Sync;

/// A middleware descriptor, resolved lazily at dispatch time.
#[derive(Clone)]
pub enum MiddlewareSpec {
    /// Resolved through the container's named-middleware registry.
    Named(String),
    /// Already a concrete middleware; returned unchanged by resolution.
    Instance(Arc<dyn Middleware>),
    /// A callback, wrapped in an adapter that applies the coercion policy.
    Function(Arc<HandlerFn>),
    /// A named action on a controller, dispatched at call time.
    Method {
        /// The receiver of the action.
        controller: Arc<dyn Controller>,
        /// The action name, validated by the controller when invoked.
        action: String,
    },
}

impl MiddlewareSpec {
    /// Creates a descriptor resolved by name through the container.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a descriptor from a concrete middleware.
    pub fn instance<M: Middleware + 'static>(middleware: M) -> Self {
        Self::Instance(Arc::new(middleware))
    }

    /// Creates a descriptor from an already-shared middleware.
    pub fn shared(middleware: Arc<dyn Middleware>) -> Self {
        Self::Instance(middleware)
    }

    /// Creates a descriptor from a callback.
    pub fn function<F>(callback: F) -> Self
    where
        F: for<'a> Fn(RouteContext, &'a mut dyn Handler) -> BoxFuture<'a, CascadeResult<Outcome>>
            + Send
            + Sync
            + 'static,
    {
        Self::Function(Arc::new(callback))
    }

    /// Creates a descriptor from a controller action.
    pub fn method(controller: Arc<dyn Controller>, action: impl Into<String>) -> Self {
        Self::Method {
            controller,
            action: action.into(),
        }
    }

    /// Validates the descriptor.
    ///
    /// Called by the pipeline on every insertion; a failed validation leaves
    /// the pipeline untouched.
    pub fn validate(&self) -> CascadeResult<()> {
        match self {
            Self::Named(name) if name.is_empty() => Err(CascadeError::invalid_middleware(
                "named",
                "middleware name must not be empty",
            )),
            Self::Method { action, .. } if action.is_empty() => Err(
                CascadeError::invalid_middleware(self.label(), "action name must not be empty"),
            ),
            _ => Ok(()),
        }
    }

    /// Returns a short label for hooks and error messages.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Instance(middleware) => middleware.name().to_string(),
            Self::Function(_) => "function".to_string(),
            Self::Method { controller, action } => format!("{}::{action}", controller.name()),
        }
    }
}

impl fmt::Debug for MiddlewareSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MiddlewareSpec").field(&self.label()).finish()
    }
}

/// The explicit context handed to callback handlers.
///
/// Replaces reflective argument injection: everything a route callback can
/// ask for (the request, the route match, its path parameters) is carried
/// here as typed state.
pub struct RouteContext {
    request: Request,
    route: Option<Arc<RouteMatch>>,
}

impl RouteContext {
    /// Creates a context for the given request, recovering the route match
    /// from the request's extensions when one has been attached.
    #[must_use]
    pub fn new(request: Request) -> Self {
        let route = RouteMatch::of(&request);
        Self { request, route }
    }

    /// Creates a context with an explicit route match.
    #[must_use]
    pub fn with_route(request: Request, route: Arc<RouteMatch>) -> Self {
        Self {
            request,
            route: Some(route),
        }
    }

    /// Returns the request.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Consumes the context and returns the request, for callbacks that
    /// delegate downstream.
    #[must_use]
    pub fn into_request(self) -> Request {
        self.request
    }

    /// Returns the route match, when dispatch has reached routing.
    #[must_use]
    pub fn route(&self) -> Option<&Arc<RouteMatch>> {
        self.route.as_ref()
    }

    /// Returns the extracted path parameters, empty before routing.
    #[must_use]
    pub fn params(&self) -> PathParams {
        self.route
            .as_ref()
            .map(|route| route.params().clone())
            .unwrap_or_default()
    }

    /// Returns a single path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route.as_ref().and_then(|route| route.param(name))
    }
}
