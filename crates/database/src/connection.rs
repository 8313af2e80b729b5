use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Establishes a connection pool to the SQLite database.
///
/// This function reads the `DATABASE_URL` from the environment (loading a
/// `.env` file first if one exists), creates a connection pool with robust
/// settings, and returns it. This pool can be shared across the entire
/// application.
pub async fn connect() -> Result<SqlitePool, DbError> {
    // Load environment variables from the .env file, if present.
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfig("DATABASE_URL must be set.".to_string()))?;

    connect_with_url(&database_url).await
}

/// Builds a pool for an explicit database URL.
///
/// Foreign-key enforcement is switched on for every connection; the cascade
/// routines in the repository rely on it to reject dangling references at
/// write time. WAL keeps concurrent readers from blocking the single writer.
pub async fn connect_with_url(database_url: &str) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(DbError::from)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// A utility function to run database migrations automatically.
///
/// This is useful for ensuring the database schema is up-to-date when the
/// application starts, which is especially important because the API server
/// and the CSV loader may be pointed at a fresh database file.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::debug!("Database migrations are up to date.");
    Ok(())
}
