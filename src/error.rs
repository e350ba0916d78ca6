use actix_web::{http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors surfaced by the discovery/swipe core and its HTTP boundary.
///
/// Every failure is scoped to a single operation; nothing here is fatal to
/// the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("You have already swiped on this user")]
    DuplicateSwipe,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
    /// Short machine-readable tag used in JSON error bodies.
    pub fn tag(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_failed",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::DuplicateSwipe => "duplicate_swipe",
            AppError::Conflict(_) => "conflict",
            AppError::Network(_) => "network_error",
            AppError::Storage(_) | AppError::Migrate(_) => "storage_error",
        }
    }
}

impl actix_web::error::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateSwipe | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Migrate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.tag().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
