/// Configuration management for Gateway Service
///
/// Values come from environment variables at startup. Missing or invalid
/// values fall back to fixed defaults; configuration never fails startup.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Failure injection for error-rate dashboards
    pub chaos: ChaosConfig,
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

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, `*` for permissive
    pub allowed_origins: String,
}

/// Failure injection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaosConfig {
    /// Probability that the chaos endpoint fails, clamped to [0, 1]
    pub failure_rate: f64,
}

/// Downstream services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownstreamConfig {
    /// Base URL of order-service
    pub order_url: String,
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
        Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("GATEWAY_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("GATEWAY_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string()),
            },
            chaos: ChaosConfig {
                failure_rate: std::env::var("CHAOS_FAILURE_RATE")
                    .ok()
                    .and_then(|v| v.parse::<f64>().ok())
                    .unwrap_or(0.5)
                    .clamp(0.0, 1.0),
            },
            downstream: DownstreamConfig {
                order_url: std::env::var("ORDER_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            },
            telemetry: TelemetryConfig {
                trace_collector_url: std::env::var("TRACE_COLLECTOR_URL")
                    .unwrap_or_else(|_| "http://localhost:14268/api/traces".to_string()),
            },
        }
    }
}
