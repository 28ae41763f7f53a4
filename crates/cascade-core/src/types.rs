//! Common HTTP types used throughout the framework.
//!
//! Cascade treats HTTP messages as opaque immutable value objects; these
//! aliases fix the body type to [`Bytes`] so headers, status, and body are
//! all accessible without an async body poll.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The HTTP request type used in the pipeline.
pub type Request = http::Request<Bytes>;

/// The HTTP response type used in the pipeline.
pub type Response = http::Response<Bytes>;

/// Unique identifier assigned to each dispatched request.
///
/// UUID v7 incorporates a Unix timestamp, making IDs time-ordered and
/// suitable for correlating log lines across a dispatch chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extension trait for building responses in the framework's canonical
/// shapes.
///
/// These constructors back the [`Outcome`](crate::Outcome) coercion policy,
/// so their status codes and content types are contractual: every variant
/// produces a `200 OK` with the content type shown.
pub trait ResponseExt {
    /// Creates a `200 OK` response with an HTML body.
    fn html(body: impl Into<String>) -> Response;

    /// Creates a `200 OK` response with a plain-text body.
    fn text(body: impl Into<String>) -> Response;

    /// Creates a `200 OK` response with a JSON body.
    fn json(value: &serde_json::Value) -> Response;
}

impl ResponseExt for Response {
    fn html(body: impl Into<String>) -> Response {
        http::Response::builder()
            .status(http::StatusCode::OK)
            .header(http::header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Bytes::from(body.into()))
            .expect("failed to build HTML response")
    }

    fn text(body: impl Into<String>) -> Response {
        http::Response::builder()
            .status(http::StatusCode::OK)
            .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Bytes::from(body.into()))
            .expect("failed to build text response")
    }

    fn json(value: &serde_json::Value) -> Response {
        http::Response::builder()
            .status(http::StatusCode::OK)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(value.to_string()))
            .expect("failed to build JSON response")
    }
}
