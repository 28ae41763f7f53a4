//! The routing stage.

use crate::resolve::resolve_route_handler;
use cascade_core::{
    BoxFuture, CascadeError, CascadeResult, Handler, Middleware, MiddlewareSpec, Request, Response,
    RouteMatch, Router,
};
use std::sync::Arc;

/// The pipeline stage that performs route dispatch.
///
/// Appended exactly once, lazily, when a request handler first dispatches,
/// so it runs after every user-declared middleware. On a match it
/// materializes the route's handlers into concrete middleware, splices them
/// at the cursor (group handler first, so it runs before the route's own
/// handler and can delegate), and continues the chain. A routing failure
/// propagates unchanged.
pub struct DispatchRoutes {
    router: Arc<dyn Router>,
}

impl DispatchRoutes {
    /// Creates the routing stage over the given router.
    #[must_use]
    pub fn new(router: Arc<dyn Router>) -> Self {
        Self { router }
    }

    fn materialize(
        &self,
        route: &Arc<RouteMatch>,
        handler: &dyn Handler,
    ) -> CascadeResult<Vec<MiddlewareSpec>> {
        let mut batch = Vec::with_capacity(2);
        for spec in [route.group_handler(), route.handler()].into_iter().flatten() {
            let resolved = resolve_route_handler(spec, handler.container(), route)?;
            batch.push(MiddlewareSpec::shared(resolved));
        }
        if batch.is_empty() {
            return Err(CascadeError::invalid_route_handler(
                route.pattern(),
                "route matched but declares no handler",
            ));
        }
        Ok(batch)
    }
}

impl Middleware for DispatchRoutes {
    fn name(&self) -> &'static str {
        "dispatch-routes"
    }

    fn process<'a>(
        &'a self,
        request: Request,
        handler: &'a mut dyn Handler,
    ) -> BoxFuture<'a, CascadeResult<Response>> {
        Box::pin(async move {
            let request = self.router.dispatch(request)?;
            let route = RouteMatch::of(&request).ok_or_else(|| {
                CascadeError::internal("router reported a match but attached none")
            })?;
            tracing::debug!(pattern = route.pattern(), "dispatching matched route");

            let batch = self.materialize(&route, handler)?;
            handler.load(batch)?;
            handler.handle(request).await
        })
    }
}
