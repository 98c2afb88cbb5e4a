// HTTP handlers for user and session endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::users::models::{
    AuthResponse, CreateUserRequest, LoginRequest, MessageResponse, TokenResponse,
    UpdateUserRequest, User,
};
use crate::validation::{Fields, IdPath, ValidJson};
use crate::AppState;

/// Register a new user
/// POST /users
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Email already exists")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Fields(request): Fields<CreateUserRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    tracing::debug!("Registering user {}", request.email);

    let response = state.user_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List all users
/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = Vec<User>)),
    tag = "users"
)]
pub async fn get_all_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.user_service.list_users().await?;

    tracing::debug!("Retrieved {} users", users.len());
    Ok(Json(users))
}

/// Get a user by id
/// GET /users/:id
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.get_user(id).await?))
}

/// Update a user by id
/// PATCH /users/:id
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid properties to update"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn update_user_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Fields(request): Fields<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.update_user(id, request).await?))
}

/// Delete a user by id
/// DELETE /users/:id
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User removed", body = MessageResponse),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn delete_user_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    state.user_service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User removed successfully!")))
}

/// Get the current user
/// GET /users/me
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized")
    ),
    tag = "profile"
)]
pub async fn get_profile(auth: AuthenticatedUser) -> Json<User> {
    Json(auth.user)
}

/// Update the current user
/// PATCH /users/me
#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Invalid properties to update"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Fields(request): Fields<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.update_user(auth.user.id, request).await?))
}

/// Delete the current user
/// DELETE /users/me
#[utoipa::path(
    delete,
    path = "/users/me",
    responses(
        (status = 200, description = "Profile removed", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "profile"
)]
pub async fn delete_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.user_service.delete_profile(auth.user.id).await?;
    Ok(Json(MessageResponse::new("Profile removed successfully!")))
}

/// Log in
/// POST /users/login
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Unable to login")
    ),
    tag = "sessions"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .user_service
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}

/// Log out of the current session
/// POST /users/logout
#[utoipa::path(
    post,
    path = "/users/logout",
    responses(
        (status = 200, description = "Session ended"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "sessions"
)]
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state.user_service.logout(auth.token_id).await?;
    Ok(StatusCode::OK)
}

/// Log out of every session
/// POST /users/logout/all
#[utoipa::path(
    post,
    path = "/users/logout/all",
    responses(
        (status = 200, description = "All sessions ended"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "sessions"
)]
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    state.user_service.logout_all(auth.user.id).await?;
    Ok(StatusCode::OK)
}
