//! # Cascade Router
//!
//! Declarative route table for the Cascade framework.
//!
//! [`RouteTable`] implements the core
//! [`Router`](cascade_core::Router) contract: it matches incoming requests
//! against `{param}` segment patterns, attaches a
//! [`RouteMatch`](cascade_core::RouteMatch) to the request, and generates
//! paths for named routes. Routes can be declared inside a group sharing a
//! path prefix and an optional group handler that runs before each member
//! route's own handler.
//!
//! # Example
//!
//! ```rust
//! use cascade_core::MiddlewareSpec;
//! use cascade_router::RouteTable;
//!
//! let mut table = RouteTable::new();
//! table
//!     .get("/users/{id}", MiddlewareSpec::named("users.show"))
//!     .name("users.show");
//!
//! assert_eq!(table.len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/cascade-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod pattern;
mod table;

pub use table::{GroupScope, Route, RouteGroup, RouteTable};
