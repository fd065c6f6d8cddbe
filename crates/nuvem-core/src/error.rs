//! Unified error types for Nuvem Drive.
//!
//! All crates map their internal failures into [`ApiError`] for consistent
//! propagation through the ? operator. Transport-level HTTP failures are
//! normalized into the kinds below; the UI never sees a raw status code.

use std::fmt;

use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
///
/// The `Display` form doubles as the machine-readable error code surfaced
/// in [`crate::types::response::ErrorBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The bearer credential was rejected (401). Distinct from permission
    /// denial so callers can trigger a logout.
    Unauthorized,
    /// The caller lacks permission to perform the action (403).
    Forbidden,
    /// The requested folder does not exist.
    FolderNotFound,
    /// The requested file does not exist.
    FileNotFound,
    /// The named user does not exist.
    UserNotFound,
    /// No share grant exists for the given folder and grantee.
    ShareNotFound,
    /// The parent folder of a create request does not exist.
    ParentNotFound,
    /// A duplicate-name or duplicate-grant conflict (409).
    Conflict,
    /// A name was empty, whitespace-only, or otherwise rejected.
    InvalidName,
    /// A grantee e-mail address failed syntax validation.
    InvalidEmail,
    /// A file rename attempted to change the extension when not permitted.
    ExtensionChange,
    /// The projected usage would exceed the storage quota.
    QuotaExceeded,
    /// The uploaded file exceeds the per-file size limit (413).
    FileTooLarge,
    /// No response was received from the server.
    Network,
    /// Any other non-2xx response.
    UnknownApi,
    /// Session vault failure (corrupt vault, wrong passphrase).
    Session,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A local I/O error occurred.
    Storage,
}

impl ErrorKind {
    /// Fixed fallback message shown when the server supplies none.
    ///
    /// Network errors always use this default; implementation detail is
    /// logged, never displayed.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Session expired or invalid",
            Self::Forbidden => "You do not have permission to perform this action",
            Self::FolderNotFound => "Folder not found",
            Self::FileNotFound => "File not found",
            Self::UserNotFound => "User not found",
            Self::ShareNotFound => "Share not found",
            Self::ParentNotFound => "Parent folder not found",
            Self::Conflict => "An item with this name already exists",
            Self::InvalidName => "Name cannot be empty",
            Self::InvalidEmail => "Invalid e-mail address",
            Self::ExtensionChange => "Changing the file extension is not allowed",
            Self::QuotaExceeded => "Storage quota exceeded",
            Self::FileTooLarge => "File exceeds the maximum allowed size",
            Self::Network => "Could not reach the server",
            Self::UnknownApi => "Unexpected server error",
            Self::Session => "Could not read the stored session",
            Self::Configuration => "Invalid configuration",
            Self::Serialization => "Serialization error",
            Self::Storage => "Local storage error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::FolderNotFound => write!(f, "FOLDER_NOT_FOUND"),
            Self::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            Self::UserNotFound => write!(f, "USER_NOT_FOUND"),
            Self::ShareNotFound => write!(f, "SHARE_NOT_FOUND"),
            Self::ParentNotFound => write!(f, "PARENT_NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::InvalidName => write!(f, "INVALID_NAME"),
            Self::InvalidEmail => write!(f, "INVALID_EMAIL"),
            Self::ExtensionChange => write!(f, "EXTENSION_CHANGE"),
            Self::QuotaExceeded => write!(f, "QUOTA_EXCEEDED"),
            Self::FileTooLarge => write!(f, "FILE_TOO_LARGE"),
            Self::Network => write!(f, "NETWORK"),
            Self::UnknownApi => write!(f, "UNKNOWN_API"),
            Self::Session => write!(f, "SESSION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Storage => write!(f, "STORAGE"),
        }
    }
}

/// The unified application error used throughout Nuvem Drive.
///
/// All crate-specific errors are mapped into `ApiError` using `From` impls
/// or explicit `.map_err()` calls. `details` carries structured payloads
/// for kinds that need more than a message (e.g. the remaining bytes on a
/// quota rejection).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Structured payload for the UI (server `details` body, quota data).
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Create a new error with an explicit message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new error carrying the kind's default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach a structured details payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Create an unauthorized (session-expired) error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a permission-denied error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a duplicate-name conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an invalid-name error.
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName, message)
    }

    /// Create an invalid-email error.
    pub fn invalid_email(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidEmail, message)
    }

    /// Create a quota-exceeded error carrying the remaining capacity.
    pub fn quota_exceeded(available_bytes: u64) -> Self {
        Self::new(
            ErrorKind::QuotaExceeded,
            format!("Storage quota exceeded; {available_bytes} bytes available"),
        )
        .with_details(serde_json::json!({ "available_bytes": available_bytes }))
    }

    /// Create a network error. The message is always the fixed default;
    /// the cause is kept for logging only.
    pub fn network(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::with_source(
            ErrorKind::Network,
            ErrorKind::Network.default_message(),
            source,
        )
    }

    /// Create a session-store error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Session, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// The remaining capacity attached to a quota rejection, if any.
    pub fn available_bytes(&self) -> Option<u64> {
        self.details
            .as_ref()
            .and_then(|d| d.get("available_bytes"))
            .and_then(|v| v.as_u64())
    }
}

impl Clone for ApiError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
