// User data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::FieldSchema;

/// User read model
///
/// Has no password column; the hash is only ever loaded through
/// [`Credentials`] during login.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = 36)]
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Id and password hash, fetched explicitly for login
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub id: i64,
    pub password_hash: String,
}

/// Registration request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "Ada")]
    pub name: String,
    #[validate(email(message = "Email is invalid"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 7, message = "Password must be at least 7 characters"))]
    #[schema(example = "secret123")]
    pub password: String,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    #[serde(default)]
    #[schema(example = 36)]
    pub age: i32,
}

/// Update request DTO, used by both `/users/:id` and `/users/me`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 7, message = "Password must be at least 7 characters"))]
    pub password: Option<String>,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
}

/// The mutable fields of a user
const USER_FIELDS: &[&str] = &["name", "email", "password", "age"];

impl FieldSchema for CreateUserRequest {
    const FIELDS: &'static [&'static str] = USER_FIELDS;
}

impl FieldSchema for UpdateUserRequest {
    const FIELDS: &'static [&'static str] = USER_FIELDS;
}

/// Login request DTO
///
/// Only `email` and `password` are read; other keys are ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "secret123")]
    pub password: String,
}

/// Registration response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Login response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Confirmation body for deletes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User removed successfully!")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
