//! Application error handling
//!
//! Converts internal errors to HTTP responses. Authentication failures are
//! collapsed here: every credential failure produces the same response, and
//! every token failure produces the same response.

use crate::auth::AuthError;
use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use myflix_shared::types::{ErrorDetail, ErrorResponse};
use myflix_shared::validation::ValidationError;
use myflix_shared::AuthFailure;
use thiserror::Error;
use tracing::error;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
pub const UNAUTHORIZED_MESSAGE: &str = "Authentication required";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {}", .0.user_message())]
    Validation(ValidationError),

    /// No usable credentials were presented
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Authentication failed: {0}")]
    Auth(AuthFailure),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("User store error")]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(failure) => ApiError::Auth(failure),
            AuthError::Store(e) => ApiError::Store(e),
            AuthError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            ApiError::Validation(v) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                v.message.clone(),
                Some(v.field.clone()),
            ),
            ApiError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                UNAUTHORIZED_MESSAGE.to_string(),
                None,
            ),
            ApiError::Auth(failure) if failure.is_token_failure() => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                UNAUTHORIZED_MESSAGE.to_string(),
                None,
            ),
            ApiError::Auth(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                INVALID_CREDENTIALS_MESSAGE.to_string(),
                None,
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Store(StoreError::Conflict(username)) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("{} already exists", username),
                None,
            ),
            ApiError::Store(err) => {
                error!("User store error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
