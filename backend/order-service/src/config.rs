/// Configuration management for Order Service
///
/// Values come from environment variables at startup. Missing or invalid
/// values fall back to fixed defaults; configuration never fails startup.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Simulated order processing
    pub order: OrderConfig,
    /// Downstream services
    pub downstream: DownstreamConfig,
    /// Telemetry endpoints
    pub telemetry: TelemetryConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Simulated order processing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Lower bound of the simulated processing delay
    pub delay_min_ms: u64,
    /// Upper bound of the simulated processing delay
    pub delay_max_ms: u64,
}

/// Downstream services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownstreamConfig {
    /// Base URL of payment-service
    pub payment_url: String,
}

/// Telemetry endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Trace collector endpoint announced to the external tracing backend
    pub trace_collector_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let delay_min_ms = std::env::var("ORDER_DELAY_MIN_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);
        let delay_max_ms = std::env::var("ORDER_DELAY_MAX_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100)
            .max(delay_min_ms);

        Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("ORDER_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("ORDER_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8081),
            },
            order: OrderConfig {
                delay_min_ms,
                delay_max_ms,
            },
            downstream: DownstreamConfig {
                payment_url: std::env::var("PAYMENT_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8082".to_string()),
            },
            telemetry: TelemetryConfig {
                trace_collector_url: std::env::var("TRACE_COLLECTOR_URL")
                    .unwrap_or_else(|_| "http://localhost:14268/api/traces".to_string()),
            },
        }
    }
}
