//! A fixed sub-chain as a single pipeline entry.

use cascade_core::{
    BoxFuture, CascadeResult, Handler, Middleware, MiddlewareSpec, Request, Response,
};

/// A middleware that splices a fixed list of descriptors at the cursor and
/// delegates.
///
/// Useful for registering a reusable middleware stack under a single name,
/// or for composing stacks at bootstrap without flattening them by hand.
/// The list runs in order, before anything not yet dispatched.
pub struct Chain {
    specs: Vec<MiddlewareSpec>,
}

impl Chain {
    /// Creates a chain over the given descriptors.
    #[must_use]
    pub fn new(specs: Vec<MiddlewareSpec>) -> Self {
        Self { specs }
    }
}

impl Middleware for Chain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn process<'a>(
        &'a self,
        request: Request,
        handler: &'a mut dyn Handler,
    ) -> BoxFuture<'a, CascadeResult<Response>> {
        Box::pin(async move {
            handler.load(self.specs.clone())?;
            handler.handle(request).await
        })
    }
}
