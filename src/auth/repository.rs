// Database repository for session tokens

use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::auth::error::AuthError;

/// Token repository for session token operations
///
/// Tokens are stored as SHA-256 digests; a session is active exactly as
/// long as its row exists.
#[derive(Clone)]
pub struct TokenRepository {
    pool: SqlitePool,
}

impl TokenRepository {
    /// Create a new TokenRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hash a token using SHA-256
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Store a session token for a user, returning the row id
    pub async fn store_token(&self, user_id: i64, token: &str) -> Result<i64, AuthError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO tokens (token_hash, user_id, created_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(Self::hash_token(token))
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Find the row id of a user's session matching the presented token
    pub async fn find_session(&self, user_id: i64, token: &str) -> Result<Option<i64>, AuthError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM tokens WHERE user_id = ? AND token_hash = ?")
                .bind(user_id)
                .bind(Self::hash_token(token))
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id,)| id))
    }

    /// Delete a single session by row id
    pub async fn delete_token(&self, token_id: i64) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM tokens WHERE id = ?")
            .bind(token_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every session of a user
    pub async fn delete_user_tokens(&self, user_id: i64) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
