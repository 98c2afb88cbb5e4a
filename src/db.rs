use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Type alias for the SQLite connection pool
pub type DbPool = SqlitePool;

/// Creates and configures a SQLite connection pool
///
/// The database file is created if missing and foreign keys are enforced,
/// which is what makes user deletion cascade to tokens and tasks.
///
/// # Arguments
/// * `database_url` - SQLite connection string (`sqlite://file.db` or `sqlite::memory:`)
/// * `max_connections` - Pool size; must be 1 for `sqlite::memory:` so every
///   query sees the same database
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Run the embedded migrations under `./migrations`
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations completed successfully");
    Ok(())
}
