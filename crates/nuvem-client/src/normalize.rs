//! Normalization of HTTP failures into the typed error taxonomy.
//!
//! The same status means different things per route: a 404 from a folder
//! route is `FOLDER_NOT_FOUND`, from a file route `FILE_NOT_FOUND`, from
//! an unshare `SHARE_NOT_FOUND`. Each call site states its route-specific
//! kinds; the shared statuses (401/403/409/413) map uniformly.

use reqwest::StatusCode;

use nuvem_core::{ApiError, ErrorKind};

use crate::wire::ServerErrorBody;

/// Route-specific status interpretation.
#[derive(Debug, Clone, Copy)]
pub struct RouteKinds {
    /// Kind for a 404 on this route.
    pub not_found: ErrorKind,
    /// Kind for a 400 on this route.
    pub bad_request: ErrorKind,
}

impl RouteKinds {
    pub fn folder() -> Self {
        Self {
            not_found: ErrorKind::FolderNotFound,
            bad_request: ErrorKind::InvalidName,
        }
    }

    pub fn file() -> Self {
        Self {
            not_found: ErrorKind::FileNotFound,
            bad_request: ErrorKind::InvalidName,
        }
    }

    pub fn with_not_found(mut self, kind: ErrorKind) -> Self {
        self.not_found = kind;
        self
    }

    pub fn with_bad_request(mut self, kind: ErrorKind) -> Self {
        self.bad_request = kind;
        self
    }
}

/// Map a non-2xx response to a typed error.
///
/// Permission and conflict errors surface the server's message when one is
/// present; 401 always uses the fixed session-expired message so the UI
/// treats it uniformly.
pub fn normalize_status(status: StatusCode, route: RouteKinds, body: ServerErrorBody) -> ApiError {
    let kind = match status {
        StatusCode::UNAUTHORIZED => return ApiError::from_kind(ErrorKind::Unauthorized),
        StatusCode::FORBIDDEN => ErrorKind::Forbidden,
        StatusCode::NOT_FOUND => route.not_found,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        StatusCode::BAD_REQUEST => route.bad_request,
        StatusCode::PAYLOAD_TOO_LARGE => ErrorKind::FileTooLarge,
        _ => ErrorKind::UnknownApi,
    };

    let message = body
        .message
        .unwrap_or_else(|| kind.default_message().to_string());
    let mut err = ApiError::new(kind, message);
    if let Some(details) = body.details {
        err = err.with_details(details);
    }
    err
}

/// Map a transport-level failure (no response received). The user-facing
/// message is always the fixed network default; the cause is retained for
/// logging only.
pub fn normalize_request_error(err: reqwest::Error) -> ApiError {
    ApiError::network(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(message: Option<&str>) -> ServerErrorBody {
        ServerErrorBody {
            message: message.map(str::to_string),
            code: None,
            details: None,
        }
    }

    #[test]
    fn test_unauthorized_uses_fixed_message() {
        let err = normalize_status(
            StatusCode::UNAUTHORIZED,
            RouteKinds::folder(),
            body(Some("token parse failure at byte 17")),
        );
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        // Server detail is dropped; the session-expired default stands.
        assert_eq!(err.message, ErrorKind::Unauthorized.default_message());
    }

    #[test]
    fn test_forbidden_prefers_server_message() {
        let err = normalize_status(
            StatusCode::FORBIDDEN,
            RouteKinds::folder(),
            body(Some("Only the owner can delete this folder")),
        );
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "Only the owner can delete this folder");
    }

    #[test]
    fn test_not_found_is_route_specific() {
        let folder = normalize_status(StatusCode::NOT_FOUND, RouteKinds::folder(), body(None));
        assert_eq!(folder.kind, ErrorKind::FolderNotFound);

        let share = normalize_status(
            StatusCode::NOT_FOUND,
            RouteKinds::folder().with_not_found(ErrorKind::ShareNotFound),
            body(None),
        );
        assert_eq!(share.kind, ErrorKind::ShareNotFound);
    }

    #[test]
    fn test_bad_request_is_route_specific() {
        let rename = normalize_status(
            StatusCode::BAD_REQUEST,
            RouteKinds::file().with_bad_request(ErrorKind::ExtensionChange),
            body(None),
        );
        assert_eq!(rename.kind, ErrorKind::ExtensionChange);
    }

    #[test]
    fn test_conflict_and_payload_too_large() {
        let conflict = normalize_status(StatusCode::CONFLICT, RouteKinds::folder(), body(None));
        assert_eq!(conflict.kind, ErrorKind::Conflict);

        let too_large =
            normalize_status(StatusCode::PAYLOAD_TOO_LARGE, RouteKinds::file(), body(None));
        assert_eq!(too_large.kind, ErrorKind::FileTooLarge);
    }

    #[test]
    fn test_unexpected_status_is_unknown_api() {
        let err = normalize_status(
            StatusCode::BAD_GATEWAY,
            RouteKinds::folder(),
            body(Some("upstream unavailable")),
        );
        assert_eq!(err.kind, ErrorKind::UnknownApi);
        assert_eq!(err.message, "upstream unavailable");
    }
}
