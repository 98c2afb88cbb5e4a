//! Configuration management for the API server
//!
//! Loads configuration from environment variables into a typed struct.
//! `main` loads a `.env` file first, if one exists.
//!
//! # Environment Variables
//!
//! - `HOST`: Host to bind to (default: 0.0.0.0)
//! - `PORT`: Port to bind to (default: 8080)
//! - `DATABASE_URL`: SQLite connection string (default: sqlite://taskmanager.db)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `JWT_SECRET`: Secret for signing session tokens (required, >= 32 chars)
//! - `JWT_PREVIOUS_SECRETS`: Comma-separated retired secrets still accepted
//!   for verification (optional)
//! - `TOKEN_TTL_SECS`: Session token lifetime (default: 604800, 7 days;
//!   must be between 1 second and 1 year)
use std::env;

const MIN_SECRET_LEN: usize = 32;
const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN)]
    WeakSecret,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign new tokens
    pub secret: String,
    /// Retired secrets still accepted when verifying
    pub previous_secrets: Vec<String>,
    /// Token lifetime in seconds
    pub token_ttl_secs: i64,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let previous_secrets = env::var("JWT_PREVIOUS_SECRETS")
            .map(|raw| parse_secret_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", 8080)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://taskmanager.db".to_string()),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            },
            auth: AuthConfig {
                secret,
                previous_secrets,
                token_ttl_secs: check_token_ttl(parse_var("TOKEN_TTL_SECS", 604_800)?)?,
            },
        })
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Read and parse a variable, falling back to `default` when unset
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Reject token lifetimes that would issue already-expired or unbounded tokens
fn check_token_ttl(secs: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(ConfigError::Invalid {
            name: "TOKEN_TTL_SECS",
            value: secs.to_string(),
        })
    }
}

/// Split a comma-separated secret list, dropping blanks
fn parse_secret_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
