use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::FieldSchema;

/// Domain model representing a task in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "buy milk")]
    pub description: String,
    #[schema(example = false)]
    pub completed: bool,
    /// Owning user
    #[schema(example = 1)]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a task
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "Description must not be empty"))]
    #[schema(example = "buy milk")]
    pub description: String,
    #[serde(default)]
    #[schema(example = false)]
    pub completed: bool,
}

/// Request DTO for updating a task; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// The mutable fields of a task, shared by create and update
const TASK_FIELDS: &[&str] = &["description", "completed"];

impl FieldSchema for CreateTaskRequest {
    const FIELDS: &'static [&'static str] = TASK_FIELDS;
}

impl FieldSchema for UpdateTaskRequest {
    const FIELDS: &'static [&'static str] = TASK_FIELDS;
}
