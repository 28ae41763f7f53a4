//! # Cascade HTTP
//!
//! The middleware dispatch core of the Cascade framework.
//!
//! A [`RequestHandler`] owns a [`Pipeline`]: an ordered, mutable list of
//! middleware descriptors plus a monotonically-advancing cursor. Dispatch
//! drives the cursor forward, lazily resolving each descriptor into a
//! concrete middleware and invoking it with the request and the handler
//! itself; middleware that want downstream behaviour call back into
//! [`Handler::handle`](cascade_core::Handler::handle), deep-diving the
//! chain through the call stack.
//!
//! Routing is just another pipeline slot: the [`DispatchRoutes`] stage is
//! appended automatically on first dispatch, matches the request, converts
//! the matched route's handlers into middleware, and splices them into the
//! pipeline at the current cursor before continuing.

#![doc(html_root_url = "https://docs.rs/cascade-http/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod callbacks;
mod emitter;
mod handler;
mod pipeline;
mod resolve;
pub mod stages;

pub use callbacks::{FunctionHandler, MethodHandler};
pub use emitter::{NullEmitter, WriterEmitter};
pub use handler::RequestHandler;
pub use pipeline::Pipeline;
pub use resolve::{resolve, resolve_route_handler};
pub use stages::{Chain, DispatchRoutes};
