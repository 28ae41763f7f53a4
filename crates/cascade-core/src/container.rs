//! Dependency injection container.
//!
//! The container has two halves: typed services keyed by [`TypeId`], and a
//! named middleware registry backing
//! [`MiddlewareSpec::Named`](crate::MiddlewareSpec::Named) descriptors.
//! Both are populated during application bootstrap and read-only afterwards;
//! the dispatch core only ever consumes `get`-style lookups.
//!
//! # Example
//!
//! ```rust
//! use cascade_core::container::Container;
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! let mut container = Container::new();
//! container.register(Arc::new(Database {
//!     url: "postgres://localhost/app".to_string(),
//! }));
//!
//! let db: Arc<Database> = container.resolve().unwrap();
//! assert_eq!(db.url, "postgres://localhost/app");
//! ```

use crate::error::{CascadeError, CascadeResult};
use crate::middleware::Middleware;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A dependency injection container.
///
/// `Send + Sync`; services must be `Arc<T>` where `T: Send + Sync`.
#[derive(Default)]
pub struct Container {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    middlewares: HashMap<String, Arc<dyn Middleware>>,
}

impl Container {
    /// Creates a new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
            middlewares: HashMap::new(),
        }
    }

    /// Registers a typed service.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), service);
    }

    /// Resolves a typed service, or `None` when it was never registered.
    #[must_use]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|service| service.clone().downcast::<T>().ok())
    }

    /// Resolves a typed service or fails with a
    /// [`CascadeError::Resolution`] error.
    pub fn resolve_required<T: Send + Sync + 'static>(&self) -> CascadeResult<Arc<T>> {
        self.resolve().ok_or_else(|| {
            CascadeError::resolution(std::any::type_name::<T>(), "service not registered")
        })
    }

    /// Checks whether a typed service is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Registers a middleware under a name.
    ///
    /// Named descriptors in the pipeline resolve through this registry.
    pub fn bind_middleware(&mut self, name: impl Into<String>, middleware: Arc<dyn Middleware>) {
        self.middlewares.insert(name.into(), middleware);
    }

    /// Resolves a named middleware.
    ///
    /// Resolution failures are fatal to the dispatch that triggered them;
    /// they propagate unretried.
    pub fn middleware(&self, name: &str) -> CascadeResult<Arc<dyn Middleware>> {
        self.middlewares
            .get(name)
            .cloned()
            .ok_or_else(|| CascadeError::resolution(name, "middleware not registered"))
    }

    /// Checks whether a named middleware is registered.
    #[must_use]
    pub fn has_middleware(&self, name: &str) -> bool {
        self.middlewares.contains_key(name)
    }

    /// Returns the number of registered typed services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no typed services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("service_count", &self.services.len())
            .field("middleware_count", &self.middlewares.len())
            .finish()
    }
}
