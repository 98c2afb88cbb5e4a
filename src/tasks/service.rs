use crate::error::ApiError;
use crate::tasks::{CreateTaskRequest, Task, TaskRepository, UpdateTaskRequest};

/// Service layer for task business logic
///
/// Every operation takes the caller's user id; there is no unscoped access.
#[derive(Clone)]
pub struct TaskService {
    repository: TaskRepository,
}

impl TaskService {
    /// Create a new TaskService
    pub fn new(repository: TaskRepository) -> Self {
        Self { repository }
    }

    /// Create a task for the caller
    pub async fn create_task(
        &self,
        user_id: i64,
        request: CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        let task = self
            .repository
            .create(user_id, &request.description, request.completed)
            .await?;

        tracing::info!("User {} created task {}", user_id, task.id);
        Ok(task)
    }

    /// List the caller's tasks
    pub async fn list_tasks(&self, user_id: i64) -> Result<Vec<Task>, ApiError> {
        Ok(self.repository.find_by_owner(user_id).await?)
    }

    /// Get one of the caller's tasks
    pub async fn get_task(&self, id: i64, user_id: i64) -> Result<Task, ApiError> {
        self.repository
            .find_owned(id, user_id)
            .await?
            .ok_or(ApiError::NotFound("Task"))
    }

    /// Update one of the caller's tasks
    pub async fn update_task(
        &self,
        id: i64,
        user_id: i64,
        request: UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        let task = self
            .repository
            .update_owned(id, user_id, request.description, request.completed)
            .await?
            .ok_or(ApiError::NotFound("Task"))?;

        tracing::info!("User {} updated task {}", user_id, id);
        Ok(task)
    }

    /// Delete one of the caller's tasks
    pub async fn delete_task(&self, id: i64, user_id: i64) -> Result<(), ApiError> {
        if !self.repository.delete_owned(id, user_id).await? {
            return Err(ApiError::NotFound("Task"));
        }

        tracing::info!("User {} deleted task {}", user_id, id);
        Ok(())
    }
}
