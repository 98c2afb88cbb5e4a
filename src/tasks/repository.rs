use chrono::Utc;
use sqlx::SqlitePool;

use crate::tasks::Task;

const TASK_COLUMNS: &str = "id, description, completed, user_id, created_at, updated_at";

/// Repository for database operations on tasks
///
/// Every lookup by id is scoped by owner in the query itself, so a task
/// belonging to someone else reads exactly like a missing one.
#[derive(Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    /// Create a new TaskRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a task owned by `user_id`
    pub async fn create(
        &self,
        user_id: i64,
        description: &str,
        completed: bool,
    ) -> Result<Task, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (description, completed, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {TASK_COLUMNS}"
        ))
        .bind(description)
        .bind(completed)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// All tasks of one owner
    pub async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Find a task by id and owner
    pub async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Update a task by id and owner; `None` fields keep their value
    pub async fn update_owned(
        &self,
        id: i64,
        user_id: i64,
        description: Option<String>,
        completed: Option<bool>,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET \
                description = COALESCE(?, description), \
                completed = COALESCE(?, completed), \
                updated_at = ? \
             WHERE id = ? AND user_id = ? RETURNING {TASK_COLUMNS}"
        ))
        .bind(description)
        .bind(completed)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a task by id and owner
    pub async fn delete_owned(&self, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
