//! Routing collaborator contracts.
//!
//! The dispatch core does not match paths itself; it consumes a [`Router`]
//! that augments the request with a [`RouteMatch`] carried in the request's
//! extensions. `cascade-router` provides the in-repo implementation.

use crate::error::CascadeResult;
use crate::spec::MiddlewareSpec;
use crate::types::Request;
use http::Method;
use std::sync::Arc;

/// Path parameters extracted from a matched route.
///
/// Backed by a `Vec` rather than a map: routes have very few parameters and
/// insertion order is meaningful for URL generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns a parameter value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over `(name, value)` pairs in extraction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no parameters were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A read-only view of a successful route match.
///
/// Produced by the router, attached to the request, and consumed once per
/// dispatch to materialize route-specific pipeline entries.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    name: Option<String>,
    method: Method,
    pattern: String,
    params: PathParams,
    handler: Option<MiddlewareSpec>,
    group_handler: Option<MiddlewareSpec>,
}

impl RouteMatch {
    /// Creates a match for the given method and route pattern.
    #[must_use]
    pub fn new(method: Method, pattern: impl Into<String>) -> Self {
        Self {
            name: None,
            method,
            pattern: pattern.into(),
            params: PathParams::new(),
            handler: None,
            group_handler: None,
        }
    }

    /// Sets the route name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the extracted path parameters.
    #[must_use]
    pub fn with_params(mut self, params: PathParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the route's own handler descriptor.
    #[must_use]
    pub fn with_handler(mut self, handler: MiddlewareSpec) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Sets the enclosing group's handler descriptor.
    #[must_use]
    pub fn with_group_handler(mut self, handler: MiddlewareSpec) -> Self {
        self.group_handler = Some(handler);
        self
    }

    /// Recovers the match attached to a dispatched request, if any.
    #[must_use]
    pub fn of(request: &Request) -> Option<Arc<RouteMatch>> {
        request.extensions().get::<Arc<RouteMatch>>().cloned()
    }

    /// Attaches this match to a request, returning the augmented request.
    #[must_use]
    pub fn attach(self: Arc<Self>, mut request: Request) -> Request {
        request.extensions_mut().insert(self);
        request
    }

    /// Returns the route name, if the route was named.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the matched method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the route's declared pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Returns a single path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns the route's own handler descriptor.
    #[must_use]
    pub fn handler(&self) -> Option<&MiddlewareSpec> {
        self.handler.as_ref()
    }

    /// Returns the enclosing group's handler descriptor.
    #[must_use]
    pub fn group_handler(&self) -> Option<&MiddlewareSpec> {
        self.group_handler.as_ref()
    }
}

/// The routing collaborator contract.
pub trait Router: Send + Sync {
    /// Matches the request, returning it augmented with an attached
    /// [`RouteMatch`]; fails with
    /// [`CascadeError::RouteNotFound`](crate::CascadeError::RouteNotFound)
    /// when nothing matches.
    fn dispatch(&self, request: Request) -> CascadeResult<Request>;

    /// Generates the path for a named route, filling in the given
    /// parameters.
    fn path_for(&self, name: &str, params: &PathParams) -> CascadeResult<String>;
}
