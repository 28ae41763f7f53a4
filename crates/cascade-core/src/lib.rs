//! # Cascade Core
//!
//! Core types and traits for the Cascade micro-framework.
//!
//! This crate provides the foundational contracts shared by every other
//! Cascade crate:
//!
//! - [`Request`] / [`Response`] - HTTP message aliases over [`http`] types
//! - [`Middleware`] / [`Handler`] - the dispatch chain contracts
//! - [`MiddlewareSpec`] - the tagged-union middleware descriptor
//! - [`Outcome`] - the return-value coercion policy for callback handlers
//! - [`Container`] - the dependency injection container
//! - [`Router`] / [`RouteMatch`] - the routing collaborator contract
//! - [`CascadeError`] - the standard error taxonomy

#![doc(html_root_url = "https://docs.rs/cascade-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod container;
mod emitter;
mod error;
mod hooks;
mod middleware;
mod module;
mod outcome;
mod route;
mod spec;
mod types;

pub use container::Container;
pub use emitter::Emitter;
pub use error::{CascadeError, CascadeResult};
pub use hooks::{DispatchHooks, NullHooks, TracingHooks};
pub use middleware::{BoxFuture, Controller, Handler, Middleware};
pub use module::Module;
pub use outcome::Outcome;
pub use route::{PathParams, RouteMatch, Router};
pub use spec::{HandlerFn, MiddlewareSpec, RouteContext};
pub use types::{Request, RequestId, Response, ResponseExt};
