//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! CoreError / ValidationError ──► ApiError (VALIDATION_ERROR, 400)
//! DbError::NotFound (posting) ──► ApiError (REFERENCE_ERROR,  400)
//! DbError::UniqueViolation    ──► ApiError (CONFLICT,         409)
//! absent GET target           ──► ApiError (NOT_FOUND,        404)
//! other DbError               ──► ApiError (STORAGE_ERROR,    500)
//! ```
//!
//! The body is always `{"code": "...", "message": "..."}` with a
//! machine-readable code and a human-readable message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tally_core::{CoreError, ValidationError};
use tally_db::DbError;

/// API error returned from HTTP handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// A submitted reference (product, customer, vendor) does not
    /// resolve (400)
    ReferenceError,

    /// Unique constraint conflict (409)
    Conflict,

    /// Storage operation failed (500)
    StorageError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    const fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::ReferenceError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::StorageError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Validation failure (400).
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Missing resource (404).
    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
    }

    /// Posting timed out; the transaction rolled back.
    pub fn timeout() -> Self {
        ApiError::new(
            ErrorCode::StorageError,
            "posting timed out; no changes were committed",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(self)).into_response()
    }
}

/// Core rejections are always client errors: they fire before any side
/// effect.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Storage failures keep their taxonomy: dangling references from a
/// posting are the caller's fault (400), constraint conflicts are 409,
/// everything else is a 500 with no partial state behind it.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::NotFound { .. } | DbError::ForeignKeyViolation { .. } => {
                ApiError::new(ErrorCode::ReferenceError, err.to_string())
            }
            DbError::UniqueViolation { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            _ => ApiError::new(ErrorCode::StorageError, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ReferenceError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::StorageError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Product", "abc").into();
        assert!(matches!(err.code, ErrorCode::ReferenceError));

        let err: ApiError = DbError::UniqueViolation {
            field: "products.sku".into(),
            value: "unknown".into(),
        }
        .into();
        assert!(matches!(err.code, ErrorCode::Conflict));

        let err: ApiError = DbError::QueryFailed("boom".into()).into();
        assert!(matches!(err.code, ErrorCode::StorageError));
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::EmptyOrder.into();
        assert!(matches!(err.code, ErrorCode::ValidationError));
    }
}
