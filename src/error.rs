// Error handling module for the Task Manager API
// Provides the service-level error type and its HTTP response conversion

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::auth::AuthError;

/// Main error type for the API
/// All services and handlers return Result<T, ApiError>
///
/// Each variant maps to one HTTP status code. Every response body has the
/// shape `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed body, disallowed field or failed field rule
    /// Maps to HTTP 400 Bad Request
    #[error("{0}")]
    Validation(String),

    /// Unknown email or wrong password. Both cases share one message.
    /// Maps to HTTP 400 Bad Request
    #[error("Unable to login!")]
    LoginFailed,

    /// Resource missing, or not owned by the caller
    /// Maps to HTTP 404 Not Found
    #[error("{0} not found!")]
    NotFound(&'static str),

    /// Duplicate resource conflict
    /// Maps to HTTP 409 Conflict
    #[error("{0}")]
    Conflict(String),

    /// Missing, invalid or revoked session
    /// Maps to HTTP 401 Unauthorized
    #[error("You are unauthorized to access this route!")]
    Unauthorized,

    /// Database operation errors
    /// Maps to HTTP 500, details are kept out of the response
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server errors
    /// Maps to HTTP 500, details are kept out of the response
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Validation(msg) => {
                debug!("Validation error: {}", msg);
                msg.clone()
            }
            ApiError::LoginFailed => {
                debug!("Rejected login attempt");
                self.to_string()
            }
            ApiError::NotFound(resource) => {
                debug!("{} not found", resource);
                self.to_string()
            }
            ApiError::Conflict(msg) => {
                warn!("Conflict error: {}", msg);
                msg.clone()
            }
            ApiError::Unauthorized => {
                warn!("Unauthorized access attempt");
                self.to_string()
            }
            ApiError::Database(db_error) => {
                error!("Database error: {:?}", db_error);
                "A database error occurred".to_string()
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                "An internal server error occurred".to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::LoginFailed => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Database(e) => ApiError::Database(e),
            AuthError::TokenGeneration(msg) | AuthError::PasswordHash(msg) => {
                ApiError::Internal(msg)
            }
            _ => ApiError::Unauthorized,
        }
    }
}
