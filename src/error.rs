use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Illegal transition: {0}")]
    IllegalTransition(String),

    #[error("Capacity not met: {0}")]
    CapacityNotMet(String),

    #[error("Role full: {0}")]
    RoleFull(String),

    #[error("Not eligible for role: {0}")]
    RoleNotEligible(String),

    #[error("Already joined: {0}")]
    DuplicateJoin(String),

    #[error("Event not open for participation: {0}")]
    EventNotOpen(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred")
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            AppError::Validation(ref msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::InvalidState(ref msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::IllegalTransition(ref msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::CapacityNotMet(ref msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::RoleFull(ref msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::RoleNotEligible(ref msg) => (StatusCode::FORBIDDEN, msg.as_str()),
            AppError::DuplicateJoin(ref msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::EventNotOpen(ref msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
