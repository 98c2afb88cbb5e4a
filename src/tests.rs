// End-to-end tests for the Task Manager API
// Each test runs against its own in-memory SQLite database

use super::*;
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

// ============================================================================
// Test Helpers
// ============================================================================

/// Fresh in-memory database with migrations applied
async fn create_test_pool() -> DbPool {
    let pool = db::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Test server plus a handle on its pool for direct assertions
async fn create_test_app() -> (TestServer, DbPool) {
    let pool = create_test_pool().await;
    let token_service = TokenService::new(TEST_SECRET, &[], 3600);
    let app = create_router(AppState::new(pool.clone(), token_service));

    (TestServer::new(app).unwrap(), pool)
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Register a user and return (user json, token)
async fn register(server: &TestServer, name: &str, email: &str) -> (Value, String) {
    let response = server
        .post("/users")
        .json(&json!({
            "name": name,
            "email": email,
            "password": "secret123",
            "age": 30
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
    let body: Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();
    (body["user"].clone(), token)
}

async fn login(server: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/users/login")
        .json(&json!({ "email": email, "password": password }))
        .await
}

async fn create_task(server: &TestServer, token: &str, description: &str) -> Value {
    let response = server
        .post("/tasks")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&json!({ "description": description }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
    response.json()
}

async fn count_rows(pool: &DbPool, table: &str, user_id: i64) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM {} WHERE user_id = ?", table))
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();
    count
}

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn test_register_returns_user_without_password_and_token() {
    let (server, _pool) = create_test_app().await;

    let response = server
        .post("/users")
        .json(&json!({
            "name": "A",
            "email": "a@x.com",
            "password": "secret123",
            "age": 30
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["user"]["name"], "A");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["age"], 30);
    assert!(body["user"]["id"].as_i64().unwrap() > 0);
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (server, _pool) = create_test_app().await;
    register(&server, "A", "a@x.com").await;

    let response = server
        .post("/users")
        .json(&json!({ "name": "B", "email": "A@X.com", "password": "secret123", "age": 20 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let (server, _pool) = create_test_app().await;

    let bad_email = server
        .post("/users")
        .json(&json!({ "name": "A", "email": "nope", "password": "secret123", "age": 30 }))
        .await;
    assert_eq!(bad_email.status_code(), StatusCode::BAD_REQUEST);

    let extra_field = server
        .post("/users")
        .json(&json!({
            "name": "A",
            "email": "a@x.com",
            "password": "secret123",
            "age": 30,
            "id": 7
        }))
        .await;
    assert_eq!(extra_field.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        extra_field.json::<Value>()["error"],
        "Invalid properties! 'id' is not one of: name, email, password, age"
    );

    let malformed = server
        .post("/users")
        .text("{not json")
        .await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = malformed.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_login_returns_working_token() {
    let (server, _pool) = create_test_app().await;
    let (user, _) = register(&server, "A", "a@x.com").await;

    let response = login(&server, "a@x.com", "secret123").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    let me = server
        .get("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);
    assert_eq!(me.json::<Value>()["id"], user["id"]);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (server, _pool) = create_test_app().await;
    register(&server, "A", "a@x.com").await;

    let wrong_password = login(&server, "a@x.com", "wrong-password").await;
    let unknown_email = login(&server, "ghost@x.com", "secret123").await;

    assert_eq!(wrong_password.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.text(), unknown_email.text());
    assert_eq!(wrong_password.json::<Value>()["error"], "Unable to login!");
}

#[tokio::test]
async fn test_login_ignores_extra_keys() {
    let (server, _pool) = create_test_app().await;
    register(&server, "A", "a@x.com").await;

    let response = server
        .post("/users/login")
        .json(&json!({ "email": "a@x.com", "password": "secret123", "remember": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.text());
    assert!(response.json::<Value>()["token"].is_string());

    let missing_password = server
        .post("/users/login")
        .json(&json!({ "email": "a@x.com" }))
        .await;
    assert_eq!(missing_password.status_code(), StatusCode::BAD_REQUEST);
    assert!(missing_password.json::<Value>()["error"].is_string());
}

// ============================================================================
// Auth gate
// ============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (server, _pool) = create_test_app().await;

    let missing = server.get("/tasks").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        missing.json::<Value>()["error"],
        "You are unauthorized to access this route!"
    );

    let garbage = server
        .get("/users/me")
        .add_header(header::AUTHORIZATION, bearer("not-a-token"))
        .await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.text(), missing.text());
}

#[tokio::test]
async fn test_signed_token_outside_session_store_is_rejected() {
    let (server, _pool) = create_test_app().await;
    let (user, _) = register(&server, "A", "a@x.com").await;

    // Correct signature for a real user, but never stored as a session.
    let forged = TokenService::new(TEST_SECRET, &[], 3600)
        .generate_token(user["id"].as_i64().unwrap())
        .unwrap();

    let response = server
        .get("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&forged))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let (server, _pool) = create_test_app().await;
    register(&server, "A", "a@x.com").await;

    let foreign = TokenService::new("a_completely_different_secret_value", &[], 3600)
        .generate_token(1)
        .unwrap();

    let response = server
        .get("/tasks")
        .add_header(header::AUTHORIZATION, bearer(&foreign))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_logout_revokes_only_presented_token() {
    let (server, _pool) = create_test_app().await;
    let (_, first) = register(&server, "A", "a@x.com").await;
    let second = login(&server, "a@x.com", "secret123").await.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .post("/users/logout")
        .add_header(header::AUTHORIZATION, bearer(&first))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let with_first = server
        .get("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&first))
        .await;
    assert_eq!(with_first.status_code(), StatusCode::UNAUTHORIZED);

    let with_second = server
        .get("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&second))
        .await;
    assert_eq!(with_second.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let (server, pool) = create_test_app().await;
    let (user, first) = register(&server, "A", "a@x.com").await;
    let user_id = user["id"].as_i64().unwrap();
    login(&server, "a@x.com", "secret123").await;
    login(&server, "a@x.com", "secret123").await;
    assert_eq!(count_rows(&pool, "tokens", user_id).await, 3);

    let response = server
        .post("/users/logout/all")
        .add_header(header::AUTHORIZATION, bearer(&first))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(count_rows(&pool, "tokens", user_id).await, 0);

    let after = server
        .get("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&first))
        .await;
    assert_eq!(after.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_service_revokes_single_session() {
    let pool = create_test_pool().await;
    let state = AppState::new(pool.clone(), TokenService::new(TEST_SECRET, &[], 3600));

    let registered = state
        .user_service
        .register(CreateUserRequest {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
            age: 30,
        })
        .await
        .unwrap();
    let user_id = registered.user.id;
    assert_eq!(count_rows(&pool, "tokens", user_id).await, 1);

    let session = state.sessions.authenticate(&registered.token).await.unwrap();
    assert_eq!(session.user.id, user_id);

    state.sessions.revoke(session.token_id).await.unwrap();
    assert_eq!(count_rows(&pool, "tokens", user_id).await, 0);
    assert!(state.sessions.authenticate(&registered.token).await.is_err());
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_list_and_get_users() {
    let (server, _pool) = create_test_app().await;
    let (a, _) = register(&server, "A", "a@x.com").await;
    register(&server, "B", "b@x.com").await;

    let list = server.get("/users").await;
    assert_eq!(list.status_code(), StatusCode::OK);
    let users: Vec<Value> = list.json();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));

    let one = server.get(&format!("/users/{}", a["id"])).await;
    assert_eq!(one.status_code(), StatusCode::OK);
    assert_eq!(one.json::<Value>()["email"], "a@x.com");

    let missing = server.get("/users/9999").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<Value>()["error"], "User not found!");

    let bad_id = server.get("/users/abc").await;
    assert_eq!(bad_id.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_with_disallowed_field_changes_nothing() {
    let (server, _pool) = create_test_app().await;
    let (user, _) = register(&server, "A", "a@x.com").await;
    let path = format!("/users/{}", user["id"]);

    let response = server
        .patch(&path)
        .json(&json!({ "name": "Mallory", "created_at": "2000-01-01T00:00:00Z" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let unchanged: Value = server.get(&path).await.json();
    assert_eq!(unchanged["name"], "A");
    assert_eq!(unchanged["updated_at"], user["updated_at"]);
}

#[tokio::test]
async fn test_update_user_by_id() {
    let (server, _pool) = create_test_app().await;
    let (user, _) = register(&server, "A", "a@x.com").await;

    let response = server
        .patch(&format!("/users/{}", user["id"]))
        .json(&json!({ "name": "Alice", "age": 31 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let updated: Value = response.json();
    assert_eq!(updated["name"], "Alice");
    assert_eq!(updated["age"], 31);
    assert_eq!(updated["email"], "a@x.com");

    let missing = server
        .patch("/users/9999")
        .json(&json!({ "name": "Nobody" }))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_update_is_rehashed() {
    let (server, _pool) = create_test_app().await;
    let (user, _) = register(&server, "A", "a@x.com").await;

    let response = server
        .patch(&format!("/users/{}", user["id"]))
        .json(&json!({ "password": "brand-new-secret" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.json::<Value>().get("password").is_none());

    assert_eq!(
        login(&server, "a@x.com", "secret123").await.status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        login(&server, "a@x.com", "brand-new-secret").await.status_code(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_profile_password_update_is_rehashed() {
    let (server, pool) = create_test_app().await;
    let (user, token) = register(&server, "A", "a@x.com").await;
    let user_id = user["id"].as_i64().unwrap();

    let response = server
        .patch("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "password": "brand-new-secret" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.json::<Value>().get("password").is_none());

    let (stored,): (String,) = sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(stored.starts_with("$argon2id$"));
    assert!(!stored.contains("brand-new-secret"));

    assert_eq!(
        login(&server, "a@x.com", "secret123").await.status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        login(&server, "a@x.com", "brand-new-secret").await.status_code(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_update_profile() {
    let (server, _pool) = create_test_app().await;
    let (_, token) = register(&server, "A", "a@x.com").await;
    register(&server, "B", "b@x.com").await;

    let response = server
        .patch("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "age": 44 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["age"], 44);
    assert!(body.get("tokens").is_none());

    let taken = server
        .patch("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "email": "b@x.com" }))
        .await;
    assert_eq!(taken.status_code(), StatusCode::CONFLICT);

    let disallowed = server
        .patch("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "tokens": [] }))
        .await;
    assert_eq!(disallowed.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_user_cascades_to_tasks_and_tokens() {
    let (server, pool) = create_test_app().await;
    let (user, token) = register(&server, "A", "a@x.com").await;
    let user_id = user["id"].as_i64().unwrap();
    let task = create_task(&server, &token, "buy milk").await;
    create_task(&server, &token, "walk dog").await;

    let response = server.delete(&format!("/users/{}", user_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], "User removed successfully!");

    assert_eq!(count_rows(&pool, "tasks", user_id).await, 0);
    assert_eq!(count_rows(&pool, "tokens", user_id).await, 0);

    let with_old_token = server
        .get(&format!("/tasks/{}", task["id"]))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(with_old_token.status_code(), StatusCode::UNAUTHORIZED);

    let again = server.delete(&format!("/users/{}", user_id)).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_profile() {
    let (server, pool) = create_test_app().await;
    let (user, token) = register(&server, "A", "a@x.com").await;
    let user_id = user["id"].as_i64().unwrap();
    create_task(&server, &token, "buy milk").await;

    let response = server
        .delete("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], "Profile removed successfully!");

    assert_eq!(count_rows(&pool, "tasks", user_id).await, 0);
    assert_eq!(count_rows(&pool, "tokens", user_id).await, 0);
    assert_eq!(
        server.get(&format!("/users/{}", user_id)).await.status_code(),
        StatusCode::NOT_FOUND
    );

    let with_old_token = server
        .get("/users/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(with_old_token.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Tasks
// ============================================================================

#[tokio::test]
async fn test_create_task_defaults_completed_to_false() {
    let (server, _pool) = create_test_app().await;
    let (user, token) = register(&server, "A", "a@x.com").await;

    let task = create_task(&server, &token, "buy milk").await;
    assert_eq!(task["description"], "buy milk");
    assert_eq!(task["completed"], false);
    assert_eq!(task["user_id"], user["id"]);
    assert!(task["created_at"].is_string());
}

#[tokio::test]
async fn test_create_task_rejects_foreign_fields() {
    let (server, _pool) = create_test_app().await;
    let (_, token) = register(&server, "A", "a@x.com").await;

    let response = server
        .post("/tasks")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "description": "buy milk", "user_id": 42 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let missing_description = server
        .post("/tasks")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "completed": true }))
        .await;
    assert_eq!(missing_description.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tasks_are_invisible_to_other_users() {
    let (server, _pool) = create_test_app().await;
    let (_, owner) = register(&server, "A", "a@x.com").await;
    let (_, intruder) = register(&server, "B", "b@x.com").await;
    let task = create_task(&server, &owner, "buy milk").await;
    let path = format!("/tasks/{}", task["id"]);

    let own = server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&owner))
        .await;
    assert_eq!(own.status_code(), StatusCode::OK);

    let foreign_get = server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&intruder))
        .await;
    let nonexistent = server
        .get("/tasks/9999")
        .add_header(header::AUTHORIZATION, bearer(&intruder))
        .await;
    assert_eq!(foreign_get.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(foreign_get.text(), nonexistent.text());

    let foreign_patch = server
        .patch(&path)
        .add_header(header::AUTHORIZATION, bearer(&intruder))
        .json(&json!({ "completed": true }))
        .await;
    assert_eq!(foreign_patch.status_code(), StatusCode::NOT_FOUND);

    let foreign_delete = server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&intruder))
        .await;
    assert_eq!(foreign_delete.status_code(), StatusCode::NOT_FOUND);

    let intruder_list: Vec<Value> = server
        .get("/tasks")
        .add_header(header::AUTHORIZATION, bearer(&intruder))
        .await
        .json();
    assert!(intruder_list.is_empty());

    // Untouched by the attempts above.
    let still_there: Value = server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&owner))
        .await
        .json();
    assert_eq!(still_there["completed"], false);
}

#[tokio::test]
async fn test_update_and_delete_own_task() {
    let (server, _pool) = create_test_app().await;
    let (_, token) = register(&server, "A", "a@x.com").await;
    let task = create_task(&server, &token, "buy milk").await;
    let path = format!("/tasks/{}", task["id"]);

    let toggled = server
        .patch(&path)
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "completed": true }))
        .await;
    assert_eq!(toggled.status_code(), StatusCode::OK);
    let body: Value = toggled.json();
    assert_eq!(body["completed"], true);
    assert_eq!(body["description"], "buy milk");

    let back = server
        .patch(&path)
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "completed": false, "description": "buy oat milk" }))
        .await;
    assert_eq!(back.json::<Value>()["description"], "buy oat milk");

    let disallowed = server
        .patch(&path)
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "id": 5 }))
        .await;
    assert_eq!(disallowed.status_code(), StatusCode::BAD_REQUEST);

    let deleted = server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(deleted.json::<Value>()["message"], "Task removed successfully!");

    let gone = server
        .get(&path)
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(gone.json::<Value>()["error"], "Task not found!");
}

#[tokio::test]
async fn test_list_tasks_returns_only_own_in_order() {
    let (server, _pool) = create_test_app().await;
    let (_, a) = register(&server, "A", "a@x.com").await;
    let (_, b) = register(&server, "B", "b@x.com").await;
    create_task(&server, &a, "first").await;
    create_task(&server, &b, "not mine").await;
    create_task(&server, &a, "second").await;

    let tasks: Vec<Value> = server
        .get("/tasks")
        .add_header(header::AUTHORIZATION, bearer(&a))
        .await
        .json();

    let descriptions: Vec<&str> = tasks
        .iter()
        .map(|t| t["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["first", "second"]);
}
