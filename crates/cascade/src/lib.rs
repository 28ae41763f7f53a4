//! # Cascade
//!
//! A small middleware-pipeline web framework.
//!
//! Everything a Cascade service does, routing included, happens inside one
//! ordered middleware pipeline:
//!
//! ```text
//! Request → declared middleware ... → DispatchRoutes → group handler → route handler
//!                                                                          ↓
//! Response ←──────────────────── chain unwinds ←──────────────────────────┘
//! ```
//!
//! Middleware are stored as lazy descriptors ([`MiddlewareSpec`]): a name
//! resolved through the container, a concrete instance, a callback, or a
//! controller action. The pipeline cursor only moves forward, and a
//! middleware continues the chain by calling back into its handler.
//!
//! ## Quick Start
//!
//! ```rust
//! use cascade::prelude::*;
//!
//! # async fn demo() -> CascadeResult<()> {
//! let mut routes = RouteTable::new();
//! routes
//!     .get(
//!         "/hello/{name}",
//!         MiddlewareSpec::function(|cx, _handler: &mut dyn Handler| {
//!             Box::pin(async move {
//!                 let name = cx.param("name").unwrap_or("world").to_string();
//!                 Ok(Outcome::from(format!("hello {name}")))
//!             })
//!         }),
//!     )
//!     .name("hello");
//!
//! let app = App::builder().routes(routes).build()?;
//!
//! let request = http::Request::builder()
//!     .uri("/hello/cascade")
//!     .body(bytes::Bytes::new())
//!     .expect("valid request");
//! let response = app.handle(request).await?;
//! assert_eq!(response.body().as_ref(), b"hello cascade");
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/cascade/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use cascade_core as core;

// Re-export the dispatch pipeline
pub use cascade_http as pipeline;

// Re-export router types
pub use cascade_router as router;

mod app;

pub use app::{App, AppBuilder};
pub use cascade_core::{CascadeError, CascadeResult, MiddlewareSpec, Outcome};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use cascade::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{App, AppBuilder};

    pub use cascade_core::{
        BoxFuture, CascadeError, CascadeResult, Container, Controller, DispatchHooks, Emitter,
        Handler, Middleware, MiddlewareSpec, Module, NullHooks, Outcome, PathParams, Request,
        RequestId, Response, ResponseExt, RouteContext, RouteMatch, Router, TracingHooks,
    };

    pub use cascade_http::{Chain, NullEmitter, Pipeline, RequestHandler, WriterEmitter};

    pub use cascade_router::RouteTable;
}
