// User service - registration, login and account management

use crate::auth::{PasswordService, SessionService};
use crate::error::ApiError;
use crate::users::{
    models::{AuthResponse, CreateUserRequest, UpdateUserRequest, User},
    repository::{UserChanges, UserRepository},
};

/// Map a unique-constraint violation on `users.email` to a 409
fn duplicate_email(error: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_unique_violation() {
            return ApiError::Conflict("Email already exists".to_string());
        }
    }
    ApiError::Database(error)
}

/// Service layer for user business logic
#[derive(Clone)]
pub struct UserService {
    repository: UserRepository,
    sessions: SessionService,
}

impl UserService {
    /// Create a new UserService
    pub fn new(repository: UserRepository, sessions: SessionService) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    /// Register a new user and open their first session
    pub async fn register(&self, request: CreateUserRequest) -> Result<AuthResponse, ApiError> {
        let password_hash = PasswordService::hash_password_blocking(request.password).await?;

        let user = self
            .repository
            .create_user(&request.name, &request.email, &password_hash, request.age)
            .await
            .map_err(duplicate_email)?;

        let token = self.sessions.issue(user.id).await?;

        tracing::info!("Registered user {}", user.id);
        Ok(AuthResponse { user, token })
    }

    /// Log a user in with email and password
    ///
    /// An unknown email and a wrong password fail identically, and both
    /// pay for one Argon2 verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let Some(credentials) = self.repository.find_credentials(email).await? else {
            PasswordService::verify_dummy_blocking(password.to_string()).await;
            return Err(ApiError::LoginFailed);
        };

        let matches = PasswordService::verify_password_blocking(
            password.to_string(),
            credentials.password_hash,
        )
        .await;
        if !matches {
            return Err(ApiError::LoginFailed);
        }

        let token = self.sessions.issue(credentials.id).await?;

        tracing::info!("User {} logged in", credentials.id);
        Ok(token)
    }

    /// List every user
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.repository.find_all().await?)
    }

    /// Get a user by id
    pub async fn get_user(&self, id: i64) -> Result<User, ApiError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("User"))
    }

    /// Update a user; a new password is rehashed before it is stored
    pub async fn update_user(&self, id: i64, request: UpdateUserRequest) -> Result<User, ApiError> {
        let password_hash = match request.password {
            Some(password) => Some(PasswordService::hash_password_blocking(password).await?),
            None => None,
        };

        let changes = UserChanges {
            name: request.name,
            email: request.email,
            password_hash,
            age: request.age,
        };

        let user = self
            .repository
            .update_user(id, changes)
            .await
            .map_err(duplicate_email)?
            .ok_or(ApiError::NotFound("User"))?;

        tracing::info!("Updated user {}", id);
        Ok(user)
    }

    /// Delete a user by id, failing with 404 if there is no such user
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        if !self.repository.delete_user(id).await? {
            return Err(ApiError::NotFound("User"));
        }

        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    /// Delete the caller's own account; the caller is known to exist
    pub async fn delete_profile(&self, id: i64) -> Result<(), ApiError> {
        self.repository.delete_user(id).await?;

        tracing::info!("User {} deleted their profile", id);
        Ok(())
    }

    /// End the session that authenticated the current request
    pub async fn logout(&self, token_id: i64) -> Result<(), ApiError> {
        Ok(self.sessions.revoke(token_id).await?)
    }

    /// End every session of the user
    pub async fn logout_all(&self, user_id: i64) -> Result<(), ApiError> {
        self.sessions.revoke_all(user_id).await?;
        Ok(())
    }
}
