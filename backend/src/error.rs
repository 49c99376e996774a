//! Application error handling
//!
//! This module provides unified error handling for the API, converting
//! internal errors to HTTP responses carrying the uniform envelope
//! `{success: false, message}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hookah_shared::types::Envelope;
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Translate a persistence failure, mapping unique-constraint
    /// violations (two concurrent registrations racing on login/email)
    /// to a user-facing conflict instead of a generic 500.
    pub fn from_persistence(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                return ApiError::Conflict(conflict_message.to_string());
            }
        }
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
        };

        (status, Json(Envelope::failure(message))).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        let msg = || "m".to_string();
        assert_eq!(status_of(ApiError::Validation(msg())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::BadRequest(msg())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::NotFound(msg())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ApiError::Unauthorized(msg())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::Forbidden(msg())), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ApiError::Conflict(msg())), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_error_body_is_failure_envelope() {
        let error = ApiError::Forbidden("Insufficient rights".to_string());
        let response = error.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Insufficient rights");
    }

    #[test]
    fn test_row_not_found_is_not_conflict() {
        let error = ApiError::from_persistence(sqlx::Error::RowNotFound, "exists");
        assert_eq!(status_of(error), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
