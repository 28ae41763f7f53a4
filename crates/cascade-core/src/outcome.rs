//! Return-value coercion for callback handlers.
//!
//! Route callbacks and controller actions return an [`Outcome`] rather than
//! a full response. The coercion policy is fixed and contractual, because
//! callers rely on implicit response inference:
//!
//! - a JSON value (mapping, sequence, ...) becomes a `200` JSON response
//! - a text string becomes a `200` HTML response
//! - another scalar (number, boolean) becomes a `200` plain-text response
//! - an already-built response passes through unchanged

use crate::error::{CascadeError, CascadeResult};
use crate::types::{Response, ResponseExt};
use serde::Serialize;

/// The raw return value of a callback handler, before coercion.
#[derive(Debug)]
pub enum Outcome {
    /// Serialized as a JSON response, status 200.
    Json(serde_json::Value),
    /// Sent as an HTML response, status 200.
    Html(String),
    /// Sent as a plain-text response, status 200.
    Text(String),
    /// Passed through unchanged.
    Response(Response),
}

impl Outcome {
    /// Serializes any value into a JSON outcome.
    pub fn json<T: Serialize>(value: &T) -> CascadeResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|err| CascadeError::handler(anyhow::Error::new(err)))?;
        Ok(Self::Json(value))
    }

    /// Applies the coercion policy, producing a concrete response.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Self::Json(value) => Response::json(&value),
            Self::Html(body) => Response::html(body),
            Self::Text(body) => Response::text(body),
            Self::Response(response) => response,
        }
    }
}

impl From<serde_json::Value> for Outcome {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Outcome {
    fn from(body: String) -> Self {
        Self::Html(body)
    }
}

impl From<&str> for Outcome {
    fn from(body: &str) -> Self {
        Self::Html(body.to_string())
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Outcome {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for Outcome {
    fn from(value: u64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Outcome {
    fn from(value: f64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}
