/// Error types for Order Service
///
/// Declined payments are not errors: the handler propagates the payment
/// response's status and error text directly. Errors here cover validation
/// and downstream transport failures.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use http_telemetry::OutboundError;
use thiserror::Error;

/// Result type for order-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed validation
    #[error("{0}")]
    Validation(String),

    /// Payment call failed at the transport layer
    #[error("payment call failed: {0}")]
    Downstream(#[from] OutboundError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "status": "failed",
            "error": self.to_string(),
        }))
    }
}
