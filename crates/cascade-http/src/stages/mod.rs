//! Built-in pipeline stages.
//!
//! Stages are ordinary middleware shipped with the framework. Routing
//! itself is one of them: [`DispatchRoutes`] sits at the end of the
//! user-declared pipeline and turns a route match into further pipeline
//! entries. [`Chain`] groups a fixed list of descriptors into a single
//! entry.

mod chain;
mod dispatch_routes;

pub use chain::Chain;
pub use dispatch_routes::DispatchRoutes;
