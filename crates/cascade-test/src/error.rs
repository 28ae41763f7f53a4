//! Test error types.

use cascade::CascadeError;
use thiserror::Error;

/// Errors that can occur while exercising an application under test.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be built.
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// The body could not be decoded.
    #[error("failed to read body: {0}")]
    BodyRead(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The application failed to produce a response.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] CascadeError),
}
