//! The application: shared state plus a request-handler factory.

use cascade_core::{
    CascadeResult, Container, DispatchHooks, Emitter, Handler, Middleware, MiddlewareSpec, Module,
    PathParams, Request, Response, Router, TracingHooks,
};
use cascade_http::{NullEmitter, RequestHandler};
use cascade_router::RouteTable;
use std::sync::Arc;

/// An assembled application.
///
/// An `App` is the immutable, shareable part of a service: the container,
/// the router, the declared middleware stack, modules, hooks, and the
/// emitter. Dispatch state lives in a [`RequestHandler`] built per request
/// by [`App::handler`]; handlers are never reused, so each request gets a
/// fresh pipeline cursor.
///
/// # Example
///
/// ```rust
/// use cascade::prelude::*;
///
/// # fn demo() -> CascadeResult<App> {
/// let mut routes = RouteTable::new();
/// routes.get(
///     "/ping",
///     MiddlewareSpec::function(|_cx, _handler: &mut dyn Handler| {
///         Box::pin(async { Ok(Outcome::from("pong")) })
///     }),
/// );
///
/// App::builder().routes(routes).build()
/// # }
/// ```
pub struct App {
    container: Arc<Container>,
    router: Arc<dyn Router>,
    middleware: Vec<MiddlewareSpec>,
    modules: Vec<Arc<dyn Module>>,
    hooks: Arc<dyn DispatchHooks>,
    emitter: Arc<dyn Emitter>,
}

impl App {
    /// Starts building an application.
    #[must_use]
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// Builds a fresh request handler seeded with the declared middleware
    /// stack.
    ///
    /// # Errors
    ///
    /// Fails with
    /// [`CascadeError::InvalidMiddleware`](cascade_core::CascadeError::InvalidMiddleware)
    /// when a declared descriptor is malformed.
    pub fn handler(&self) -> CascadeResult<RequestHandler> {
        let mut handler = RequestHandler::new(Arc::clone(&self.container), Arc::clone(&self.router))
            .with_hooks(Arc::clone(&self.hooks))
            .with_emitter(Arc::clone(&self.emitter))
            .with_modules(self.modules.iter().map(Arc::clone));
        for spec in &self.middleware {
            handler.push(spec.clone())?;
        }
        Ok(handler)
    }

    /// Dispatches a single request through a fresh handler.
    ///
    /// # Errors
    ///
    /// Propagates any dispatch error unchanged.
    pub async fn handle(&self, request: Request) -> CascadeResult<Response> {
        let mut handler = self.handler()?;
        handler.handle(request).await
    }

    /// Dispatches a single request and emits the response through the
    /// configured emitter.
    ///
    /// # Errors
    ///
    /// Propagates any dispatch or emission error unchanged.
    pub async fn run(&self, request: Request) -> CascadeResult<()> {
        self.handler()?.run(request).await
    }

    /// Generates the path for a named route.
    ///
    /// # Errors
    ///
    /// Fails with
    /// [`CascadeError::UnknownRoute`](cascade_core::CascadeError::UnknownRoute)
    /// when no route carries the name, or with a resolution error when a
    /// required parameter is missing.
    pub fn path_for(&self, name: &str, params: &PathParams) -> CascadeResult<String> {
        self.router.path_for(name, params)
    }

    /// Returns the dependency injection container.
    #[must_use]
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }
}

/// Builder for [`App`].
#[must_use]
pub struct AppBuilder {
    container: Container,
    router: Option<Arc<dyn Router>>,
    middleware: Vec<MiddlewareSpec>,
    modules: Vec<Arc<dyn Module>>,
    hooks: Arc<dyn DispatchHooks>,
    emitter: Arc<dyn Emitter>,
}

impl AppBuilder {
    fn new() -> Self {
        Self {
            container: Container::new(),
            router: None,
            middleware: Vec::new(),
            modules: Vec::new(),
            hooks: Arc::new(TracingHooks),
            emitter: Arc::new(NullEmitter),
        }
    }

    /// Uses a declared route table as the router.
    pub fn routes(self, routes: RouteTable) -> Self {
        self.router(Arc::new(routes))
    }

    /// Uses a custom router implementation.
    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    /// Declares a middleware that runs, in declaration order, before
    /// routing on every request.
    pub fn middleware(mut self, spec: MiddlewareSpec) -> Self {
        self.middleware.push(spec);
        self
    }

    /// Registers a module, bootstrapped once per handler on first
    /// dispatch.
    pub fn module(mut self, module: Arc<dyn Module>) -> Self {
        self.modules.push(module);
        self
    }

    /// Replaces the dispatch hooks.
    pub fn hooks(mut self, hooks: Arc<dyn DispatchHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replaces the response emitter.
    pub fn emitter(mut self, emitter: Arc<dyn Emitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Registers a typed service in the container.
    pub fn service<T: Send + Sync + 'static>(mut self, service: Arc<T>) -> Self {
        self.container.register(service);
        self
    }

    /// Registers a middleware under a name, resolvable from
    /// [`MiddlewareSpec::named`] descriptors.
    pub fn bind_middleware(
        mut self,
        name: impl Into<String>,
        middleware: Arc<dyn Middleware>,
    ) -> Self {
        self.container.bind_middleware(name, middleware);
        self
    }

    /// Assembles the application, validating every declared middleware
    /// descriptor.
    ///
    /// An application built without routes gets an empty route table, so
    /// every request that reaches routing fails with
    /// [`CascadeError::RouteNotFound`](cascade_core::CascadeError::RouteNotFound).
    ///
    /// # Errors
    ///
    /// Fails with
    /// [`CascadeError::InvalidMiddleware`](cascade_core::CascadeError::InvalidMiddleware)
    /// when a declared descriptor is malformed.
    pub fn build(self) -> CascadeResult<App> {
        for spec in &self.middleware {
            spec.validate()?;
        }
        Ok(App {
            container: Arc::new(self.container),
            router: self
                .router
                .unwrap_or_else(|| Arc::new(RouteTable::new())),
            middleware: self.middleware,
            modules: self.modules,
            hooks: self.hooks,
            emitter: self.emitter,
        })
    }
}
