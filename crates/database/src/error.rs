use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfig(String),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The referenced row does not exist. Carries the entity name so the API
    /// boundary can render "Customer not found" etc.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A unique or foreign-key constraint was violated by the store
    /// (duplicate customer email, dangling foreign key, ...).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other failure surfaced by the driver (connection loss, I/O, ...).
    #[error("Database query failed: {0}")]
    Query(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                DbError::ConstraintViolation(db_err.message().to_string())
            }
            other => DbError::Query(other),
        }
    }
}
