//! The request handler.

use crate::emitter::NullEmitter;
use crate::pipeline::Pipeline;
use crate::resolve::resolve;
use crate::stages::DispatchRoutes;
use cascade_core::{
    BoxFuture, CascadeError, CascadeResult, Container, DispatchHooks, Emitter, Handler, Middleware,
    MiddlewareSpec, Module, Request, RequestId, Response, Router, TracingHooks,
};
use std::sync::Arc;

/// The dispatch entry point; one instance serves one request.
///
/// A handler owns the [`Pipeline`] and drives it: each call to
/// [`Handler::handle`] resolves the descriptor at the cursor, advances the
/// cursor, and invokes the resolved middleware with the request and the
/// handler itself, so the chain deep-dives through the call stack and
/// unwinds producing exactly one response. The first call also performs
/// one-time setup: modules are bootstrapped in registration order, then the
/// [`DispatchRoutes`] stage is appended so routing always runs after every
/// user-declared middleware.
///
/// Handlers are cheap to build from shared parts (container, router, hooks
/// are all behind `Arc`s) and are not reused across requests; the cursor
/// never rewinds.
///
/// # Example
///
/// ```ignore
/// let mut handler = RequestHandler::new(container, router);
/// handler.push(MiddlewareSpec::named("logging"))?;
/// let response = handler.handle(request).await?;
/// ```
pub struct RequestHandler {
    request_id: RequestId,
    container: Arc<Container>,
    router: Arc<dyn Router>,
    pipeline: Pipeline,
    modules: Vec<Arc<dyn Module>>,
    hooks: Arc<dyn DispatchHooks>,
    emitter: Arc<dyn Emitter>,
    response: Option<Response>,
    depth: usize,
}

impl RequestHandler {
    /// Creates a handler over the given container and router, with
    /// [`TracingHooks`] and no-op emission.
    #[must_use]
    pub fn new(container: Arc<Container>, router: Arc<dyn Router>) -> Self {
        Self {
            request_id: RequestId::new(),
            container,
            router,
            pipeline: Pipeline::new(),
            modules: Vec::new(),
            hooks: Arc::new(TracingHooks),
            emitter: Arc::new(NullEmitter),
            response: None,
            depth: 0,
        }
    }

    /// Replaces the dispatch hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn DispatchHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replaces the response emitter used by [`RequestHandler::run`].
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<dyn Emitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Registers a module, bootstrapped on first dispatch.
    #[must_use]
    pub fn with_module(mut self, module: Arc<dyn Module>) -> Self {
        self.modules.push(module);
        self
    }

    /// Registers several modules, bootstrapped in order on first dispatch.
    #[must_use]
    pub fn with_modules(mut self, modules: impl IntoIterator<Item = Arc<dyn Module>>) -> Self {
        self.modules.extend(modules);
        self
    }

    /// Returns this request's id.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Arc<dyn Router> {
        &self.router
    }

    /// Returns a read-only view of the pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Dispatches the request and emits the resulting response.
    ///
    /// # Errors
    ///
    /// Propagates any dispatch error unchanged, and any emission error from
    /// the configured [`Emitter`].
    pub async fn run(&mut self, request: Request) -> CascadeResult<()> {
        let response = self.handle(request).await?;
        self.emitter.emit(&response)
    }

    fn ensure_started(&mut self) -> CascadeResult<()> {
        if self.pipeline.started() {
            return Ok(());
        }
        let modules = self.modules.clone();
        for module in modules {
            tracing::debug!(
                request_id = %self.request_id,
                module = module.name(),
                "bootstrapping module"
            );
            module.bootstrap(self)?;
        }
        self.pipeline
            .push(MiddlewareSpec::instance(DispatchRoutes::new(Arc::clone(
                &self.router,
            ))))?;
        self.pipeline.mark_started();
        Ok(())
    }

    fn current_middleware(&self) -> CascadeResult<Option<Arc<dyn Middleware>>> {
        match self.pipeline.current() {
            Some(spec) => resolve(spec, &self.container).map(Some),
            None => Ok(None),
        }
    }

    async fn step(&mut self, request: Request) -> CascadeResult<Response> {
        self.ensure_started()?;
        let current = self.current_middleware()?;
        // Advance before invoking, so re-entrant calls from inside the
        // middleware see the next position.
        self.pipeline.advance();

        if let Some(middleware) = current {
            self.hooks.middleware_loaded(self.request_id, middleware.name());
            let response = middleware.process(request, self).await?;
            self.response = Some(response);
        }
        self.response.take().ok_or(CascadeError::PipelineExhausted)
    }
}

impl Handler for RequestHandler {
    fn handle<'a>(&'a mut self, request: Request) -> BoxFuture<'a, CascadeResult<Response>> {
        Box::pin(async move {
            let method = request.method().clone();
            let uri = request.uri().clone();

            self.depth += 1;
            let outcome = self.step(request).await;
            self.depth -= 1;

            // The chain unwinds through nested handle() calls; the failure
            // hook fires only at the outermost one, exactly once.
            if let Err(error) = &outcome {
                if self.depth == 0 {
                    self.hooks
                        .request_failed(self.request_id, error, &method, &uri);
                }
            }
            outcome
        })
    }

    fn push(&mut self, spec: MiddlewareSpec) -> CascadeResult<()> {
        self.pipeline.push(spec)
    }

    fn insert_next(&mut self, spec: MiddlewareSpec) -> CascadeResult<()> {
        self.pipeline.insert_next(spec)
    }

    fn load(&mut self, batch: Vec<MiddlewareSpec>) -> CascadeResult<()> {
        self.pipeline.splice(batch)
    }

    fn container(&self) -> &Container {
        &self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use cascade_core::{NullHooks, Outcome, PathParams, ResponseExt, RouteMatch};
    use cascade_router::RouteTable;
    use http::{Method, StatusCode, Uri};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn request(method: Method, path: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    fn handler_for(table: RouteTable) -> RequestHandler {
        RequestHandler::new(Arc::new(Container::new()), Arc::new(table))
    }

    /// A middleware that records its name and delegates downstream.
    struct Tracer {
        name: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Middleware for Tracer {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            request: Request,
            handler: &'a mut dyn Handler,
        ) -> BoxFuture<'a, CascadeResult<Response>> {
            Box::pin(async move {
                self.seen.lock().unwrap().push(self.name);
                handler.handle(request).await
            })
        }
    }

    fn tracer(name: &'static str, seen: &Arc<Mutex<Vec<&'static str>>>) -> MiddlewareSpec {
        MiddlewareSpec::instance(Tracer {
            name,
            seen: Arc::clone(seen),
        })
    }

    fn pong(table: &mut RouteTable) {
        table.get(
            "/ping",
            MiddlewareSpec::function(|_cx, _handler: &mut dyn Handler| {
                Box::pin(async { Ok(Outcome::from("pong")) })
            }),
        );
    }

    #[tokio::test]
    async fn test_route_callback_produces_response() {
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = handler_for(table);
        let response = handler.handle(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"pong");
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_json_route() {
        let mut table = RouteTable::new();
        table.get(
            "/hello",
            MiddlewareSpec::function(|_cx, _handler: &mut dyn Handler| {
                Box::pin(async { Ok(Outcome::from(serde_json::json!({"hello": "world"}))) })
            }),
        );

        let mut handler = handler_for(table);
        let response = handler
            .handle(request(Method::GET, "/hello"))
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let decoded: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(decoded, serde_json::json!({"hello": "world"}));
    }

    #[tokio::test]
    async fn test_middleware_runs_before_routing() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = handler_for(table);
        handler.push(tracer("outer", &seen)).unwrap();
        handler.push(tracer("inner", &seen)).unwrap();

        let response = handler.handle(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"pong");
        assert_eq!(*seen.lock().unwrap(), ["outer", "inner"]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_routing() {
        struct Teapot;

        impl Middleware for Teapot {
            fn name(&self) -> &'static str {
                "teapot"
            }

            fn process<'a>(
                &'a self,
                _request: Request,
                _handler: &'a mut dyn Handler,
            ) -> BoxFuture<'a, CascadeResult<Response>> {
                Box::pin(async {
                    let mut response = Response::text("short and stout");
                    *response.status_mut() = StatusCode::IM_A_TEAPOT;
                    Ok(response)
                })
            }
        }

        // Empty route table: routing would fail if it were reached.
        let mut handler = handler_for(RouteTable::new());
        handler.push(MiddlewareSpec::instance(Teapot)).unwrap();

        let response = handler.handle(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        // Only the short-circuiting middleware was dispatched.
        assert_eq!(handler.pipeline().cursor(), 1);
    }

    #[tokio::test]
    async fn test_group_handler_runs_before_route_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut table = RouteTable::new();
        let auth = tracer("auth", &seen);
        table.group("/admin", Some(auth), |admin| {
            admin.get(
                "/settings",
                MiddlewareSpec::function(|_cx, _handler: &mut dyn Handler| {
                    Box::pin(async { Ok(Outcome::from("settings")) })
                }),
            );
        });

        let mut handler = handler_for(table);
        let response = handler
            .handle(request(Method::GET, "/admin/settings"))
            .await
            .unwrap();
        assert_eq!(response.body().as_ref(), b"settings");
        assert_eq!(*seen.lock().unwrap(), ["auth"]);
    }

    #[tokio::test]
    async fn test_route_params_reach_callback() {
        let mut table = RouteTable::new();
        table.get(
            "/users/{id}",
            MiddlewareSpec::function(|cx, _handler: &mut dyn Handler| {
                Box::pin(async move {
                    Ok(Outcome::from(format!(
                        "user {}",
                        cx.param("id").unwrap_or("?")
                    )))
                })
            }),
        );

        let mut handler = handler_for(table);
        let response = handler
            .handle(request(Method::GET, "/users/42"))
            .await
            .unwrap();
        assert_eq!(response.body().as_ref(), b"user 42");
    }

    #[tokio::test]
    async fn test_unmatched_route_propagates_not_found() {
        let mut handler = handler_for(RouteTable::new());
        let err = handler
            .handle(request(Method::GET, "/missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, CascadeError::RouteNotFound { .. }));
    }

    #[tokio::test]
    async fn test_named_middleware_resolves_through_container() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut container = Container::new();
        container.bind_middleware(
            "trace",
            Arc::new(Tracer {
                name: "trace",
                seen: Arc::clone(&seen),
            }),
        );
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = RequestHandler::new(Arc::new(container), Arc::new(table));
        handler.push(MiddlewareSpec::named("trace")).unwrap();

        handler.handle(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), ["trace"]);
    }

    #[tokio::test]
    async fn test_unregistered_named_middleware_fails() {
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = handler_for(table);
        handler.push(MiddlewareSpec::named("ghost")).unwrap();

        let err = handler
            .handle(request(Method::GET, "/ping"))
            .await
            .unwrap_err();
        assert!(matches!(err, CascadeError::Resolution { .. }));
    }

    #[tokio::test]
    async fn test_cursor_advances_once_per_step() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = handler_for(table);
        handler.push(tracer("a", &seen)).unwrap();
        handler.push(tracer("b", &seen)).unwrap();

        handler.handle(request(Method::GET, "/ping")).await.unwrap();
        // a, b, dispatch-routes, spliced route handler: four steps.
        assert_eq!(handler.pipeline().cursor(), 4);
        assert_eq!(handler.pipeline().len(), 4);
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        struct Seeder {
            bootstraps: Arc<AtomicUsize>,
        }

        impl Module for Seeder {
            fn name(&self) -> &'static str {
                "seeder"
            }

            fn bootstrap(&self, _handler: &mut dyn Handler) -> CascadeResult<()> {
                self.bootstraps.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let bootstraps = Arc::new(AtomicUsize::new(0));
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = handler_for(table).with_module(Arc::new(Seeder {
            bootstraps: Arc::clone(&bootstraps),
        }));

        // The chain re-enters handle() several times within one dispatch;
        // setup must still run exactly once.
        handler.handle(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(bootstraps.load(Ordering::SeqCst), 1);
        let len = handler.pipeline().len();

        // A second call on the same handler neither re-bootstraps nor
        // appends a second routing stage; the spent pipeline just has
        // nothing left to produce.
        let err = handler
            .handle(request(Method::GET, "/ping"))
            .await
            .unwrap_err();
        assert!(matches!(err, CascadeError::PipelineExhausted));
        assert_eq!(bootstraps.load(Ordering::SeqCst), 1);
        assert_eq!(handler.pipeline().len(), len);
    }

    #[tokio::test]
    async fn test_module_middleware_runs_in_registration_order() {
        struct Seeder {
            name: &'static str,
            seen: Arc<Mutex<Vec<&'static str>>>,
        }

        impl Module for Seeder {
            fn name(&self) -> &'static str {
                self.name
            }

            fn bootstrap(&self, handler: &mut dyn Handler) -> CascadeResult<()> {
                handler.push(MiddlewareSpec::instance(Tracer {
                    name: self.name,
                    seen: Arc::clone(&self.seen),
                }))
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = handler_for(table)
            .with_module(Arc::new(Seeder {
                name: "first",
                seen: Arc::clone(&seen),
            }))
            .with_module(Arc::new(Seeder {
                name: "second",
                seen: Arc::clone(&seen),
            }));

        handler.handle(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), ["first", "second"]);
    }

    #[tokio::test]
    async fn test_failure_hook_fires_once_and_error_propagates() {
        #[derive(Default)]
        struct CountingHooks {
            loaded: AtomicUsize,
            failed: AtomicUsize,
            last_failure: Mutex<Option<(Method, Uri, String)>>,
        }

        impl DispatchHooks for CountingHooks {
            fn middleware_loaded(&self, _request_id: RequestId, _name: &str) {
                self.loaded.fetch_add(1, Ordering::SeqCst);
            }

            fn request_failed(
                &self,
                _request_id: RequestId,
                error: &CascadeError,
                method: &Method,
                uri: &Uri,
            ) {
                self.failed.fetch_add(1, Ordering::SeqCst);
                *self.last_failure.lock().unwrap() =
                    Some((method.clone(), uri.clone(), error.to_string()));
            }
        }

        let hooks = Arc::new(CountingHooks::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut table = RouteTable::new();
        table.get(
            "/boom",
            MiddlewareSpec::function(|_cx, _handler: &mut dyn Handler| {
                Box::pin(async { Err(CascadeError::handler(anyhow::anyhow!("boom"))) })
            }),
        );

        let mut handler = handler_for(table).with_hooks(Arc::clone(&hooks) as Arc<dyn DispatchHooks>);
        // A delegating middleware above the failing route, so the error
        // unwinds through several nested handle() calls.
        handler.push(tracer("outer", &seen)).unwrap();

        let err = handler
            .handle(request(Method::GET, "/boom"))
            .await
            .unwrap_err();
        assert!(matches!(err, CascadeError::Handler { .. }));

        assert_eq!(hooks.failed.load(Ordering::SeqCst), 1);
        let (method, uri, message) = hooks.last_failure.lock().unwrap().clone().unwrap();
        assert_eq!(method, Method::GET);
        assert_eq!(uri.path(), "/boom");
        assert!(message.contains("boom"));
    }

    #[tokio::test]
    async fn test_loaded_hook_fires_per_dispatched_middleware() {
        struct LoadedHooks {
            names: Mutex<Vec<String>>,
        }

        impl DispatchHooks for LoadedHooks {
            fn middleware_loaded(&self, _request_id: RequestId, name: &str) {
                self.names.lock().unwrap().push(name.to_string());
            }
        }

        let hooks = Arc::new(LoadedHooks {
            names: Mutex::new(Vec::new()),
        });
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = handler_for(table).with_hooks(Arc::clone(&hooks) as Arc<dyn DispatchHooks>);
        handler.handle(request(Method::GET, "/ping")).await.unwrap();

        assert_eq!(
            *hooks.names.lock().unwrap(),
            ["dispatch-routes", "function"]
        );
    }

    #[tokio::test]
    async fn test_missing_route_attachment_is_an_internal_error() {
        struct Vanish;

        impl cascade_core::Router for Vanish {
            fn dispatch(&self, request: Request) -> CascadeResult<Request> {
                // Pretend to match but attach nothing and splice nothing.
                Ok(request)
            }

            fn path_for(&self, name: &str, _params: &PathParams) -> CascadeResult<String> {
                Err(CascadeError::UnknownRoute {
                    name: name.to_string(),
                })
            }
        }

        let mut handler = RequestHandler::new(Arc::new(Container::new()), Arc::new(Vanish));
        let err = handler
            .handle(request(Method::GET, "/anything"))
            .await
            .unwrap_err();
        // The routing stage notices the missing attachment first.
        assert!(matches!(err, CascadeError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_insert_next_runs_spliced_middleware() {
        struct Injector {
            seen: Arc<Mutex<Vec<&'static str>>>,
        }

        impl Middleware for Injector {
            fn name(&self) -> &'static str {
                "injector"
            }

            fn process<'a>(
                &'a self,
                request: Request,
                handler: &'a mut dyn Handler,
            ) -> BoxFuture<'a, CascadeResult<Response>> {
                Box::pin(async move {
                    let seen = Arc::clone(&self.seen);
                    handler.insert_next(MiddlewareSpec::instance(Tracer {
                        name: "injected",
                        seen,
                    }))?;
                    handler.handle(request).await
                })
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut table = RouteTable::new();
        pong(&mut table);

        let mut handler = handler_for(table);
        handler
            .push(MiddlewareSpec::instance(Injector {
                seen: Arc::clone(&seen),
            }))
            .unwrap();
        handler.push(tracer("declared", &seen)).unwrap();

        let response = handler.handle(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"pong");
        assert_eq!(*seen.lock().unwrap(), ["declared", "injected"]);
    }

    #[tokio::test]
    async fn test_chain_splices_in_order() {
        use crate::stages::Chain;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut table = RouteTable::new();
        pong(&mut table);

        let chain = Chain::new(vec![tracer("one", &seen), tracer("two", &seen)]);
        let mut handler = handler_for(table).with_hooks(Arc::new(NullHooks));
        handler.push(MiddlewareSpec::instance(chain)).unwrap();

        let response = handler.handle(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(response.body().as_ref(), b"pong");
        assert_eq!(*seen.lock().unwrap(), ["one", "two"]);
    }

    #[tokio::test]
    async fn test_route_match_visible_to_surrounding_middleware() {
        // A middleware spliced by routing sees the match through the
        // request's extensions even without an explicit binding.
        struct PatternEcho;

        impl Middleware for PatternEcho {
            fn name(&self) -> &'static str {
                "pattern-echo"
            }

            fn process<'a>(
                &'a self,
                request: Request,
                handler: &'a mut dyn Handler,
            ) -> BoxFuture<'a, CascadeResult<Response>> {
                Box::pin(async move {
                    let pattern = RouteMatch::of(&request)
                        .map(|route| route.pattern().to_string())
                        .unwrap_or_default();
                    let mut response = handler.handle(request).await?;
                    response
                        .headers_mut()
                        .insert("x-route", pattern.parse().map_err(|_| {
                            CascadeError::internal("route pattern is not a header value")
                        })?);
                    Ok(response)
                })
            }
        }

        let mut table = RouteTable::new();
        table.group(
            "/api",
            Some(MiddlewareSpec::instance(PatternEcho)),
            |api| {
                api.get(
                    "/ping",
                    MiddlewareSpec::function(|_cx, _handler: &mut dyn Handler| {
                        Box::pin(async { Ok(Outcome::from("pong")) })
                    }),
                );
            },
        );

        let mut handler = handler_for(table);
        let response = handler
            .handle(request(Method::GET, "/api/ping"))
            .await
            .unwrap();
        assert_eq!(response.headers().get("x-route").unwrap(), "/api/ping");
    }
}
