// Authentication gate for protected routes

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::error::AuthError;
use crate::users::User;
use crate::AppState;

/// Authenticated user extractor for protected routes
///
/// Carries the user loaded from the store and the row id of the session
/// that authenticated this request, so logout can revoke exactly it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token_id: i64,
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let authenticated = state.sessions.authenticate(token).await?;

        debug!(
            "Authenticated user_id={} session={} endpoint={}",
            authenticated.user.id,
            authenticated.token_id,
            parts.uri.path()
        );
        Ok(authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn create_parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    fn create_parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        let parts = create_parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_authorization_header() {
        let parts = create_parts_without_auth();
        assert!(matches!(bearer_token(&parts), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_invalid_bearer_format() {
        let invalid_formats = vec![
            "InvalidFormat token",
            "token_without_bearer",
            "Basic dXNlcjpwYXNz",
            "Bearer ",
        ];

        for auth_value in invalid_formats {
            let parts = create_parts_with_auth(auth_value);
            assert!(
                matches!(bearer_token(&parts), Err(AuthError::InvalidToken)),
                "{auth_value:?} should be rejected"
            );
        }
    }
}
