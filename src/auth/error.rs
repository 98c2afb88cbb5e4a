// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Message returned for every rejected session, whatever the cause.
pub const UNAUTHORIZED_MESSAGE: &str = "You are unauthorized to access this route!";

/// Errors raised while issuing or checking sessions and passwords
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// The token verifies but its user no longer exists
    #[error("Token refers to an unknown user")]
    UnknownUser,

    /// The token verifies but is not in the active-session set
    #[error("Token has been revoked")]
    UnknownSession,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenGeneration(_) | AuthError::PasswordHash(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::UNAUTHORIZED {
            // The cause stays in the logs; clients all see the same body.
            warn!("Rejected session: {}", self);
            UNAUTHORIZED_MESSAGE.to_string()
        } else {
            error!("Authentication failure: {}", self);
            "Internal server error".to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
