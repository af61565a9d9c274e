use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::intake::{DeleteError, IntakeError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every failure renders as `{ "success": false, "message": ... }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::InvalidOwner => AppError::Validation(err.to_string()),
            IntakeError::Rejected(reason) => AppError::Validation(reason.to_string()),
            IntakeError::Storage(e) => AppError::Storage(format!("Failed to upload file: {e}")),
        }
    }
}

impl From<DeleteError> for AppError {
    fn from(err: DeleteError) -> Self {
        match err {
            DeleteError::Forbidden => AppError::Forbidden(err.to_string()),
            DeleteError::InvalidName => AppError::Validation(err.to_string()),
            DeleteError::NotFound => AppError::NotFound(err.to_string()),
            DeleteError::Io(e) => AppError::Storage(format!("Failed to delete file: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::validation::ValidationError;

    #[test]
    fn test_rejection_maps_to_bad_request() {
        let err: AppError = IntakeError::Rejected(ValidationError::TooLarge {
            limit: "5MB".to_string(),
        }).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_rejection_message_is_verbatim() {
        let err: AppError = IntakeError::Rejected(ValidationError::TooLarge {
            limit: "5MB".to_string(),
        }).into();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "File size must be less than 5MB"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_delete_errors_map_to_status() {
        let forbidden: AppError = DeleteError::Forbidden.into();
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

        let missing: AppError = DeleteError::NotFound.into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_error_is_server_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: AppError = IntakeError::Storage(io).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
