// JWT session token generation and validation

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,    // user_id
    pub jti: String, // unique per issued session
    pub exp: i64,    // expiration timestamp
    pub iat: i64,    // issued at timestamp
}

/// Token service for JWT operations
///
/// Signs with the current secret and verifies against the current secret
/// followed by any previous secrets, so a secret can be rotated without
/// invalidating sessions issued under the old one.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_keys: Vec<DecodingKey>,
    validation: Validation,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService
    pub fn new(secret: &str, previous_secrets: &[String], token_duration: i64) -> Self {
        let decoding_keys = std::iter::once(secret)
            .chain(previous_secrets.iter().map(String::as_str))
            .map(|s| DecodingKey::from_secret(s.as_bytes()))
            .collect();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_keys,
            validation: Validation::new(Algorithm::HS256),
            token_duration,
        }
    }

    /// Issue a signed session token for a user
    pub fn generate_token(&self, user_id: i64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let exp = now
            .checked_add(self.token_duration)
            .ok_or_else(|| AuthError::TokenGeneration("token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        for key in &self.decoding_keys {
            match decode::<Claims>(token, key, &self.validation) {
                Ok(data) => return Ok(data.claims),
                // Signature is checked first, so an expired token was signed by this key.
                Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                    return Err(AuthError::ExpiredToken)
                }
                Err(e) if matches!(e.kind(), ErrorKind::InvalidSignature) => continue,
                Err(_) => return Err(AuthError::InvalidToken),
            }
        }

        Err(AuthError::InvalidToken)
    }
}
