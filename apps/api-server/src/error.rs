//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use user_store::UserStoreError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request input, rejected before the record service runs.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Failure reported by the record service or the store.
    #[error(transparent)]
    Store(#[from] UserStoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Store(UserStoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "User not found".to_string())
            }
            ApiError::Store(UserStoreError::DuplicateEmail { .. }) => {
                (StatusCode::CONFLICT, "Email already exists".to_string())
            }
            ApiError::Store(error) => {
                // Internal store detail stays in the logs, never in the body.
                tracing::error!(%error, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handler operations.
pub type ApiResult<T> = Result<T, ApiError>;
