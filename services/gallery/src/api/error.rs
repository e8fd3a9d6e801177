//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every gallery endpoint
//! returns the same `{code, message, request_id}` body.
//!
//! # Key invariants and assumptions
//! - Status codes align with the error category: validation 400, forbidden
//!   403, not found 404, storage or I/O failure 500.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
use crate::api::types::ErrorResponse;
use crate::observability;
use crate::service::ServiceError;
use crate::store::StoreError;
use crate::uploads::UploadError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Invariants
/// - `status` must match the semantics of `body.code`.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use gallery::api::error::ApiError;
/// use gallery::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         code: "not_found".to_string(),
///         message: "album not found".to_string(),
///         request_id: None,
///     },
/// };
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

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 500 Internal Server Error from a store error.
///
/// Logs the store error and returns a generic internal error response.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    // Log internal details server-side; the client only sees `message`.
    tracing::error!(error = ?err, "gallery storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 500 Internal Server Error without a store error.
pub fn api_internal_message(message: &str) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 403 Forbidden error.
pub fn api_forbidden(message: &str) -> ApiError {
    api_error(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    // Client input failed validation or was malformed.
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Map an upload failure: request problems are 400, local I/O is 500.
pub fn api_upload_error(err: &UploadError) -> ApiError {
    metrics::counter!(observability::UPLOAD_REJECTIONS_TOTAL, "reason" => err.reason()).increment(1);
    if err.is_client_error() {
        api_validation_error(&err.to_string())
    } else {
        tracing::error!(error = ?err, "failed to store upload");
        api_internal_message("failed to store upload")
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Forbidden => api_forbidden("Forbidden: Admin access required."),
            ServiceError::NotFound(message) => api_not_found(message),
            ServiceError::Validation(message) => api_validation_error(&message),
            ServiceError::Store(err) => api_internal("gallery storage failure", &err),
        }
    }
}
