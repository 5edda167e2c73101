use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::keywords::KeywordError;
use crate::resumes::provider::ResumeSourceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// The completion service failed. The message is passed through so the
    /// caller can decide whether to retry.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Constraint violations are caused by the request (an unknown org, status or
/// location id) and become 400s. Everything else stays a database error.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if let Some(message) = constraint_message(db.code().as_deref(), db.constraint()) {
                return AppError::Validation(message);
            }
        }
        AppError::Database(err)
    }
}

/// Postgres SQLSTATE 23503 (foreign key) and 23514 (check).
fn constraint_message(code: Option<&str>, constraint: Option<&str>) -> Option<String> {
    let message = match code? {
        "23503" => "referenced record does not exist",
        "23514" => "value is out of range",
        _ => return None,
    };
    Some(match constraint {
        Some(name) => format!("{message} ({name})"),
        None => message.to_string(),
    })
}

impl From<KeywordError> for AppError {
    fn from(err: KeywordError) -> Self {
        match err {
            KeywordError::EmptyInput(_) => AppError::Validation(err.to_string()),
            KeywordError::Upstream(e) => AppError::Upstream(e.to_string()),
        }
    }
}

impl From<ResumeSourceError> for AppError {
    fn from(err: ResumeSourceError) -> Self {
        match err {
            ResumeSourceError::NotFound(_) => AppError::NotFound(err.to_string()),
            ResumeSourceError::Unreadable { .. } => AppError::Validation(err.to_string()),
            ResumeSourceError::Database(e) => AppError::from(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("Completion service error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
