// Authentication module
// JWT session tokens backed by a session store, Argon2 password hashing

pub mod error;
pub mod middleware;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::AuthenticatedUser;
pub use password::PasswordService;
pub use repository::TokenRepository;
pub use service::SessionService;
pub use token::TokenService;
