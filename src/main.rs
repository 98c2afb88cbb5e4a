pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod tasks;
pub mod users;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{SessionService, TokenRepository, TokenService};
use config::Config;
use db::DbPool;
use tasks::{CreateTaskRequest, Task, TaskRepository, TaskService, UpdateTaskRequest};
use users::{
    AuthResponse, CreateUserRequest, LoginRequest, MessageResponse, TokenResponse,
    UpdateUserRequest, User, UserRepository, UserService,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        users::create_user,
        users::get_all_users,
        users::get_user_by_id,
        users::update_user_by_id,
        users::delete_user_by_id,
        users::get_profile,
        users::update_profile,
        users::delete_profile,
        users::login,
        users::logout,
        users::logout_all,
        tasks::create_task,
        tasks::get_all_tasks,
        tasks::get_task_by_id,
        tasks::update_task_by_id,
        tasks::delete_task_by_id,
    ),
    components(schemas(
        User,
        CreateUserRequest,
        UpdateUserRequest,
        LoginRequest,
        AuthResponse,
        TokenResponse,
        MessageResponse,
        Task,
        CreateTaskRequest,
        UpdateTaskRequest,
    )),
    tags(
        (name = "users", description = "User accounts"),
        (name = "profile", description = "The authenticated user's own account"),
        (name = "sessions", description = "Login and logout"),
        (name = "tasks", description = "Tasks of the authenticated user")
    ),
    info(
        title = "Task Manager API",
        version = "1.0.0",
        description = "Multi-user task management with bearer-token sessions"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    pub user_service: UserService,
    pub task_service: TaskService,
}

impl AppState {
    /// Wire repositories and services on top of one pool
    pub fn new(db: DbPool, token_service: TokenService) -> Self {
        let user_repo = UserRepository::new(db.clone());
        let sessions = SessionService::new(
            token_service,
            TokenRepository::new(db.clone()),
            user_repo.clone(),
        );

        Self {
            user_service: UserService::new(user_repo, sessions.clone()),
            task_service: TaskService::new(TaskRepository::new(db)),
            sessions,
        }
    }
}

/// Creates and configures the application router
/// Routes requiring a session take an `AuthenticatedUser` argument
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Users and sessions
        .route("/users", post(users::create_user).get(users::get_all_users))
        .route("/users/login", post(users::login))
        .route("/users/logout", post(users::logout))
        .route("/users/logout/all", post(users::logout_all))
        .route(
            "/users/me",
            get(users::get_profile)
                .patch(users::update_profile)
                .delete(users::delete_profile),
        )
        .route(
            "/users/:id",
            get(users::get_user_by_id)
                .patch(users::update_user_by_id)
                .delete(users::delete_user_by_id),
        )
        // Tasks
        .route("/tasks", post(tasks::create_task).get(tasks::get_all_tasks))
        .route(
            "/tasks/:id",
            get(tasks::get_task_by_id)
                .patch(tasks::update_task_by_id)
                .delete(tasks::delete_task_by_id),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskmanager_api=debug,tower_http=debug")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Task Manager API - Starting...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let token_service = TokenService::new(
        &config.auth.secret,
        &config.auth.previous_secrets,
        config.auth.token_ttl_secs,
    );
    if !config.auth.previous_secrets.is_empty() {
        tracing::info!(
            "Accepting tokens signed with {} retired secret(s)",
            config.auth.previous_secrets.len()
        );
    }

    let app = create_router(AppState::new(db_pool, token_service));

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Task Manager API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
