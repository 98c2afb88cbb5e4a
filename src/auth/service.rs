// Session service - issues, checks and revokes session tokens

use crate::auth::{
    error::AuthError, middleware::AuthenticatedUser, repository::TokenRepository,
    token::TokenService,
};
use crate::users::UserRepository;

/// Session service coordinating token signing and the session store
#[derive(Clone)]
pub struct SessionService {
    token_service: TokenService,
    token_repo: TokenRepository,
    user_repo: UserRepository,
}

impl SessionService {
    /// Create a new SessionService
    pub fn new(
        token_service: TokenService,
        token_repo: TokenRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            token_service,
            token_repo,
            user_repo,
        }
    }

    /// Sign a new token for the user and record it as an active session
    pub async fn issue(&self, user_id: i64) -> Result<String, AuthError> {
        let token = self.token_service.generate_token(user_id)?;
        let token_id = self.token_repo.store_token(user_id, &token).await?;

        tracing::debug!("Issued session {} for user {}", token_id, user_id);
        Ok(token)
    }

    /// Resolve a bearer token to its user and session row
    ///
    /// The token must verify against the signing secrets AND still be
    /// present in the session store; either check alone is not enough.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.token_service.validate_token(token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        let token_id = self
            .token_repo
            .find_session(user.id, token)
            .await?
            .ok_or(AuthError::UnknownSession)?;

        Ok(AuthenticatedUser { user, token_id })
    }

    /// Revoke exactly one session
    pub async fn revoke(&self, token_id: i64) -> Result<(), AuthError> {
        self.token_repo.delete_token(token_id).await?;
        tracing::debug!("Revoked session {}", token_id);
        Ok(())
    }

    /// Revoke every session of a user
    pub async fn revoke_all(&self, user_id: i64) -> Result<u64, AuthError> {
        let removed = self.token_repo.delete_user_tokens(user_id).await?;
        tracing::info!("Revoked {} sessions for user {}", removed, user_id);
        Ok(removed)
    }
}
