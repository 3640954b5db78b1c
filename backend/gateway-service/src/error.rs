/// Error types for Gateway Service
///
/// Downstream business failures are not errors here: the gateway propagates
/// order-service's status and body unchanged. Errors cover the transport
/// failure surface only.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use http_telemetry::OutboundError;
use thiserror::Error;

/// Result type for gateway-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Order call failed at the transport layer
    #[error("order call failed: {0}")]
    Downstream(#[from] OutboundError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
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
