//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every endpoint returns the
//! same `{code, message, request_id}` shape.
//!
//! # Key invariants and assumptions
//! - `status` and `body.code` always agree.
//! - Authorization failures carry the fixed message `forbidden` and never name
//!   the rule, role, or ownership field that was evaluated.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use trattoria_api::api::error::api_not_found;
///
/// let err = api_not_found("dish not found");
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// assert_eq!(err.body.code, "not_found");
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 409 Conflict error with a caller-provided code.
pub fn api_conflict(code: &str, message: &str) -> ApiError {
    api_error(StatusCode::CONFLICT, code, message)
}

/// Build a 500 error from a store failure.
///
/// The store error is logged; the response only carries `message`.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

pub fn api_internal_message(message: &str) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 401 error for a missing or unusable credential.
pub fn api_unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// Build a 403 error for a denied authorization check.
pub fn api_forbidden(message: &str) -> ApiError {
    api_error(StatusCode::FORBIDDEN, "forbidden", message)
}

pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Map a failed lookup of `what` to 404 or 500.
pub fn api_lookup_failed(what: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => api_not_found(&format!("{what} not found")),
        err => api_internal(&format!("failed to load {what}"), &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_helpers_build_expected_codes() {
        let not_found = api_not_found("missing");
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.code, "not_found");

        let conflict = api_conflict("email_taken", "conflict");
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.body.code, "email_taken");

        let internal = api_internal_message("oops");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body.code, "internal");

        let unauthorized = api_unauthorized("nope");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.body.code, "unauthorized");

        let forbidden = api_forbidden("forbidden");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        assert_eq!(forbidden.body.code, "forbidden");

        let validation = api_validation_error("bad");
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.code, "validation_error");
    }

    #[test]
    fn api_internal_hides_store_error() {
        let err = StoreError::Unexpected(anyhow::anyhow!("boom"));
        let api = api_internal("storage failed", &err);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body.message, "storage failed");
    }

    #[test]
    fn lookup_failures_split_on_not_found() {
        let missing = api_lookup_failed("order", StoreError::NotFound("order 3".into()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body.message, "order not found");

        let broken = api_lookup_failed("order", StoreError::Unexpected(anyhow::anyhow!("io")));
        assert_eq!(broken.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(broken.body.message, "failed to load order");
    }
}
