// Password hashing and verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use std::sync::OnceLock;

use crate::auth::error::AuthError;

/// Hash verified against when a login names no account
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Password service for hashing and verification
///
/// Uses Argon2id with the crate's default (fixed) cost parameters and a
/// fresh random salt per hash. Hashes are stored in PHC string format.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Verify a password against a stored hash
    ///
    /// A hash that cannot be parsed counts as a mismatch.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!("Stored password hash is unreadable: {}", e);
                false
            }
        }
    }

    /// Hash on tokio's blocking pool; Argon2 is deliberately CPU-heavy.
    pub async fn hash_password_blocking(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
    }

    /// Verify on tokio's blocking pool
    pub async fn verify_password_blocking(password: String, hash: String) -> bool {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .unwrap_or(false)
    }

    /// Spend one verification on a throwaway hash; always `false`
    ///
    /// Keeps a login for an unknown email as slow as a wrong password.
    pub async fn verify_dummy_blocking(password: String) -> bool {
        tokio::task::spawn_blocking(move || {
            let hash = DUMMY_HASH.get_or_init(|| {
                Self::hash_password("no account has this password").unwrap_or_default()
            });
            Self::verify_password(&password, hash);
            false
        })
        .await
        .unwrap_or(false)
    }
}
