//! Convenience result type alias for Nuvem Drive.

use crate::error::ApiError;

/// A specialized `Result` type for Nuvem Drive operations.
///
/// This is defined as a convenience so that every crate does not need to
/// write `Result<T, ApiError>` explicitly.
pub type ApiResult<T> = Result<T, ApiError>;
