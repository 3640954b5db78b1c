/// Gateway Service Library
///
/// Entry point of the Orderflow chain. Accepts external checkout requests,
/// forwards them to order-service, and returns the downstream response
/// unchanged. Mints the root trace context for every external request.
///
/// # Modules
///
/// - `handlers`: checkout and chaos HTTP request handlers
/// - `metrics`: domain metric families
/// - `error`: error types and handling
/// - `config`: configuration management
/// - `server`: HTTP server assembly
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;

pub use config::Config;
pub use error::{AppError, Result};
pub use server::{serve, SERVICE_NAME};
