//! Discriminated result shape surfaced to the UI layer.
//!
//! Every transport and coordinator call resolves to `{success, data,
//! error}` rather than raising; the UI branches on `success` and renders
//! `error.code`/`error.message` when set.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Serializable error body carried by a failed [`Outcome`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (the `ErrorKind` display form).
    pub code: String,
    /// Human-readable message (server-provided when present, otherwise the
    /// kind's fixed default).
    pub message: String,
    /// Optional structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.kind.to_string(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// The `{success, data, error}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload on success.
    pub data: Option<T>,
    /// Error body on failure.
    pub error: Option<ErrorBody>,
}

impl<T> Outcome<T> {
    /// Build a successful outcome.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Build a failed outcome from an [`ApiError`].
    pub fn err(err: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody::from(err)),
        }
    }
}

impl<T> From<Result<T, ApiError>> for Outcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(&err),
        }
    }
}
