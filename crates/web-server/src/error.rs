use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Request bodies that fail to deserialize (missing required fields, unknown
/// fields, wrong types, malformed JSON) all count as validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// NotFound -> 404, validation -> 422, constraint violations surfaced by the
/// store -> 409. Everything else is an opaque 500: the details go to the log,
/// not to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(DbError::NotFound(entity)) => {
                (StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            AppError::Database(DbError::ConstraintViolation(message)) => {
                (StatusCode::CONFLICT, format!("Constraint violation: {message}"))
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
