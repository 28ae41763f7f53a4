//! The route table.

use crate::pattern::Pattern;
use cascade_core::{
    CascadeError, CascadeResult, MiddlewareSpec, PathParams, Request, RouteMatch, Router,
};
use http::Method;
use std::sync::Arc;

/// A declared route.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    pattern: Pattern,
    name: Option<String>,
    handler: Option<MiddlewareSpec>,
    group: Option<usize>,
}

impl Route {
    /// Names the route for URL generation.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the route's method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the route's full pattern, group prefix included.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.raw()
    }
}

/// A group of routes sharing a path prefix and an optional handler.
///
/// When a member route matches, the group's handler is materialized into
/// the pipeline before the route's own handler, so it runs first and can
/// delegate.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    prefix: String,
    handler: Option<MiddlewareSpec>,
}

impl RouteGroup {
    /// Returns the group's path prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// An ordered route table; the in-repo [`Router`] implementation.
///
/// Matching is a first-match linear scan in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    groups: Vec<RouteGroup>,
}

impl RouteTable {
    /// Creates an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a route.
    pub fn route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: MiddlewareSpec,
    ) -> &mut Route {
        self.push_route(method, pattern, Some(handler), None)
    }

    /// Declares a `GET` route.
    pub fn get(&mut self, pattern: &str, handler: MiddlewareSpec) -> &mut Route {
        self.route(Method::GET, pattern, handler)
    }

    /// Declares a `POST` route.
    pub fn post(&mut self, pattern: &str, handler: MiddlewareSpec) -> &mut Route {
        self.route(Method::POST, pattern, handler)
    }

    /// Declares a `PUT` route.
    pub fn put(&mut self, pattern: &str, handler: MiddlewareSpec) -> &mut Route {
        self.route(Method::PUT, pattern, handler)
    }

    /// Declares a `DELETE` route.
    pub fn delete(&mut self, pattern: &str, handler: MiddlewareSpec) -> &mut Route {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Declares a group of routes sharing a prefix and an optional group
    /// handler.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cascade_core::MiddlewareSpec;
    /// use cascade_router::RouteTable;
    ///
    /// let mut table = RouteTable::new();
    /// table.group("/admin", Some(MiddlewareSpec::named("auth")), |admin| {
    ///     admin.get("/settings", MiddlewareSpec::named("admin.settings"));
    /// });
    /// ```
    pub fn group<F>(&mut self, prefix: &str, handler: Option<MiddlewareSpec>, scope: F)
    where
        F: FnOnce(&mut GroupScope<'_>),
    {
        self.groups.push(RouteGroup {
            prefix: prefix.trim_end_matches('/').to_string(),
            handler,
        });
        let group = self.groups.len() - 1;
        scope(&mut GroupScope { table: self, group });
    }

    /// Returns the number of declared routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` when no routes are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn push_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Option<MiddlewareSpec>,
        group: Option<usize>,
    ) -> &mut Route {
        let full = match group {
            Some(index) => format!("{}{pattern}", self.groups[index].prefix),
            None => pattern.to_string(),
        };
        self.routes.push(Route {
            method,
            pattern: Pattern::parse(&full),
            name: None,
            handler,
            group,
        });
        self.routes.last_mut().expect("route was just pushed")
    }

    fn match_request(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        for route in &self.routes {
            if route.method != *method {
                continue;
            }
            let Some(params) = route.pattern.matches(path) else {
                continue;
            };

            let mut matched = RouteMatch::new(route.method.clone(), route.pattern.raw())
                .with_params(params);
            if let Some(name) = &route.name {
                matched = matched.with_name(name.clone());
            }
            if let Some(handler) = &route.handler {
                matched = matched.with_handler(handler.clone());
            }
            if let Some(handler) = route
                .group
                .and_then(|index| self.groups[index].handler.clone())
            {
                matched = matched.with_group_handler(handler);
            }
            return Some(matched);
        }
        None
    }
}

impl Router for RouteTable {
    fn dispatch(&self, request: Request) -> CascadeResult<Request> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        match self.match_request(&method, &path) {
            Some(matched) => {
                tracing::debug!(method = %method, path = %path, pattern = matched.pattern(), "route matched");
                Ok(Arc::new(matched).attach(request))
            }
            None => Err(CascadeError::RouteNotFound { method, path }),
        }
    }

    fn path_for(&self, name: &str, params: &PathParams) -> CascadeResult<String> {
        self.routes
            .iter()
            .find(|route| route.name.as_deref() == Some(name))
            .ok_or_else(|| CascadeError::UnknownRoute {
                name: name.to_string(),
            })?
            .pattern
            .fill(params)
    }
}

/// Route registration scoped to a group.
pub struct GroupScope<'a> {
    table: &'a mut RouteTable,
    group: usize,
}

impl GroupScope<'_> {
    /// Declares a route inside the group.
    pub fn route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: MiddlewareSpec,
    ) -> &mut Route {
        self.table
            .push_route(method, pattern, Some(handler), Some(self.group))
    }

    /// Declares a `GET` route inside the group.
    pub fn get(&mut self, pattern: &str, handler: MiddlewareSpec) -> &mut Route {
        self.route(Method::GET, pattern, handler)
    }

    /// Declares a `POST` route inside the group.
    pub fn post(&mut self, pattern: &str, handler: MiddlewareSpec) -> &mut Route {
        self.route(Method::POST, pattern, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn request(method: Method, path: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    fn spec(name: &str) -> MiddlewareSpec {
        MiddlewareSpec::named(name)
    }

    #[test]
    fn test_dispatch_attaches_match() {
        let mut table = RouteTable::new();
        table.get("/ping", spec("ping")).name("ping");

        let matched = table.dispatch(request(Method::GET, "/ping")).unwrap();
        let matched = RouteMatch::of(&matched).unwrap();
        assert_eq!(matched.name(), Some("ping"));
        assert_eq!(matched.pattern(), "/ping");
        assert_eq!(matched.handler().unwrap().label(), "ping");
        assert!(matched.group_handler().is_none());
    }

    #[test]
    fn test_dispatch_extracts_params() {
        let mut table = RouteTable::new();
        table.get("/users/{id}", spec("users.show"));

        let matched = table.dispatch(request(Method::GET, "/users/42")).unwrap();
        let matched = RouteMatch::of(&matched).unwrap();
        assert_eq!(matched.param("id"), Some("42"));
    }

    #[test]
    fn test_method_mismatch_is_not_found() {
        let mut table = RouteTable::new();
        table.get("/ping", spec("ping"));

        let err = table.dispatch(request(Method::POST, "/ping")).unwrap_err();
        assert!(matches!(err, CascadeError::RouteNotFound { .. }));
    }

    #[test]
    fn test_no_route_is_not_found() {
        let table = RouteTable::new();
        let err = table.dispatch(request(Method::GET, "/missing")).unwrap_err();
        assert_eq!(err.to_string(), "no route matches GET /missing");
    }

    #[test]
    fn test_first_declared_route_wins() {
        let mut table = RouteTable::new();
        table.get("/users/{id}", spec("first"));
        table.get("/users/{other}", spec("second"));

        let matched = table.dispatch(request(Method::GET, "/users/1")).unwrap();
        let matched = RouteMatch::of(&matched).unwrap();
        assert_eq!(matched.handler().unwrap().label(), "first");
    }

    #[test]
    fn test_group_prefix_and_handler() {
        let mut table = RouteTable::new();
        table.group("/admin", Some(spec("auth")), |admin| {
            admin.get("/settings", spec("admin.settings")).name("admin.settings");
        });

        let matched = table
            .dispatch(request(Method::GET, "/admin/settings"))
            .unwrap();
        let matched = RouteMatch::of(&matched).unwrap();
        assert_eq!(matched.pattern(), "/admin/settings");
        assert_eq!(matched.group_handler().unwrap().label(), "auth");
        assert_eq!(matched.handler().unwrap().label(), "admin.settings");

        // The bare prefix itself is not a route.
        assert!(table.dispatch(request(Method::GET, "/admin")).is_err());
    }

    #[test]
    fn test_path_for_named_route() {
        let mut table = RouteTable::new();
        table.get("/users/{id}", spec("users.show")).name("users.show");

        let mut params = PathParams::new();
        params.insert("id", "42");
        assert_eq!(table.path_for("users.show", &params).unwrap(), "/users/42");

        assert!(matches!(
            table.path_for("ghost", &params),
            Err(CascadeError::UnknownRoute { .. })
        ));
    }
}
