//! Error types for Cascade.
//!
//! [`CascadeError`] is the standard error type used throughout the
//! framework. The dispatch core never converts an error into an HTTP
//! response; every variant propagates unchanged to the caller of
//! `handle`/`run`, after being reported once through the dispatch hooks.

use http::Method;
use thiserror::Error;

/// Result type alias using [`CascadeError`].
pub type CascadeResult<T> = Result<T, CascadeError>;

/// Standard error type for Cascade.
///
/// The taxonomy distinguishes programming errors surfaced at mutation time
/// (`InvalidMiddleware`, `InvalidPosition`), routing failures
/// (`RouteNotFound`, `InvalidRouteHandler`), container failures
/// (`Resolution`), transport failures (`AlreadyEmitted`, `Emit`), and
/// uncaught failures from user middleware (`Handler`). None of these are
/// retryable; none are recovered inside the dispatch core.
#[derive(Error, Debug)]
pub enum CascadeError {
    /// A middleware descriptor failed validation at mutation time.
    #[error("invalid middleware [{label}]: {message}")]
    InvalidMiddleware {
        /// Short description of the offending descriptor.
        label: String,
        /// Why the descriptor was rejected.
        message: String,
    },

    /// A pipeline insertion index was out of bounds.
    #[error("position {index} is not valid for a pipeline of {len} entries; it should be the start, the end, or in between")]
    InvalidPosition {
        /// The requested insertion index.
        index: usize,
        /// The pipeline length at the time of the insertion.
        len: usize,
    },

    /// A matched route's handler could not be turned into a middleware.
    #[error("route `{route}` has no usable handler: {message}")]
    InvalidRouteHandler {
        /// The pattern of the offending route.
        route: String,
        /// Why the handler was rejected.
        message: String,
    },

    /// The router could not match the incoming request.
    #[error("no route matches {method} {path}")]
    RouteNotFound {
        /// The request method.
        method: Method,
        /// The request path.
        path: String,
    },

    /// A named route does not exist (URL generation).
    #[error("no route named `{name}`")]
    UnknownRoute {
        /// The requested route name.
        name: String,
    },

    /// The container could not produce an instance for a key.
    #[error("failed to resolve `{name}`: {reason}")]
    Resolution {
        /// The key that was looked up.
        name: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The chain ran out of entries before any middleware produced a
    /// response. This is a contract violation of the caller: a pipeline
    /// must terminate in a response-producing stage.
    #[error("pipeline exhausted before a response was produced")]
    PipelineExhausted,

    /// A response has already been written to the transport boundary.
    #[error("a response has already been emitted")]
    AlreadyEmitted,

    /// Writing the response to the transport boundary failed.
    #[error("failed to emit response")]
    Emit(#[from] std::io::Error),

    /// An internal invariant was violated.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },

    /// An uncaught failure from user middleware, carried unchanged.
    #[error("handler failed: {source}")]
    Handler {
        /// The underlying failure.
        #[source]
        source: anyhow::Error,
    },
}

impl CascadeError {
    /// Creates an [`CascadeError::InvalidMiddleware`] error.
    pub fn invalid_middleware(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMiddleware {
            label: label.into(),
            message: message.into(),
        }
    }

    /// Creates an [`CascadeError::InvalidRouteHandler`] error.
    pub fn invalid_route_handler(route: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRouteHandler {
            route: route.into(),
            message: message.into(),
        }
    }

    /// Creates a [`CascadeError::Resolution`] error.
    pub fn resolution(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`CascadeError::Internal`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wraps an arbitrary failure from user middleware.
    pub fn handler(source: impl Into<anyhow::Error>) -> Self {
        Self::Handler {
            source: source.into(),
        }
    }
}

impl From<anyhow::Error> for CascadeError {
    fn from(source: anyhow::Error) -> Self {
        Self::Handler { source }
    }
}
