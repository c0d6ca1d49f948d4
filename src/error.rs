use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::json;

/// Failures raised by the data-access layer.
///
/// Absent rows are not errors: lookups return `Option` and deletes return
/// `bool`, so callers decide what absence means.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A foreign id supplied by the caller does not resolve to a row.
    #[error("{entity} {id} not found")]
    DanglingReference { entity: &'static str, id: i32 },
    /// A unique constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Storage(DbErr),
}

impl From<DbErr> for RepoError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(detail),
            _ => Self::Storage(err),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("request validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self::Repo(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(entity) => {
                (StatusCode::NOT_FOUND, json!({ "detail": format!("{entity} not found") }))
            },
            AppError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "detail": errors }))
            },
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "detail": message })),
            AppError::Repo(err @ RepoError::DanglingReference { .. }) => {
                (StatusCode::NOT_FOUND, json!({ "detail": err.to_string() }))
            },
            AppError::Repo(RepoError::Conflict(message)) => {
                (StatusCode::CONFLICT, json!({ "detail": message }))
            },
            AppError::Repo(RepoError::Storage(err)) => {
                tracing::error!(error = %err, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "internal server error" }))
            },
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
