// HTTP handlers for task endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::tasks::{CreateTaskRequest, Task, UpdateTaskRequest};
use crate::users::MessageResponse;
use crate::validation::{Fields, IdPath};
use crate::AppState;

/// Create a task for the current user
/// POST /tasks
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Fields(request): Fields<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.task_service.create_task(auth.user.id, request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// List the current user's tasks
/// GET /tasks
#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "Tasks of the current user", body = Vec<Task>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks"
)]
pub async fn get_all_tasks(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.task_service.list_tasks(auth.user.id).await?))
}

/// Get a task by id
/// GET /tasks/:id
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn get_task_by_id(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    IdPath(id): IdPath,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.task_service.get_task(id, auth.user.id).await?))
}

/// Update a task by id
/// PATCH /tasks/:id
#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid properties to update"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn update_task_by_id(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    IdPath(id): IdPath,
    Fields(request): Fields<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(
        state
            .task_service
            .update_task(id, auth.user.id, request)
            .await?,
    ))
}

/// Delete a task by id
/// DELETE /tasks/:id
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task removed", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn delete_task_by_id(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    state.task_service.delete_task(id, auth.user.id).await?;
    Ok(Json(MessageResponse::new("Task removed successfully!")))
}
