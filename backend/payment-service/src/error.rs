/// Error types for Payment Service
///
/// Simulated declines are not errors; they are normal business outcomes and
/// are rendered directly by the handlers. Errors here cover the remaining
/// failure surface visible to API clients.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for payment-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed validation
    #[error("{0}")]
    Validation(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "status": "failed",
            "error": self.to_string(),
        }))
    }
}
