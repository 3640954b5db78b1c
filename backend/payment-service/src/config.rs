/// Configuration management for Payment Service
///
/// Values come from environment variables at startup. Missing or invalid
/// values fall back to fixed defaults; configuration never fails startup.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Simulated payment processing
    pub payment: PaymentConfig,
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

/// Simulated payment processing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Probability of a simulated decline, clamped to [0, 1]
    pub decline_rate: f64,
    /// Lower bound of the simulated processing delay
    pub delay_min_ms: u64,
    /// Upper bound of the simulated processing delay
    pub delay_max_ms: u64,
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
        let decline_rate = env_or("PAYMENT_DECLINE_RATE", 0.15_f64).clamp(0.0, 1.0);
        let delay_min_ms = env_or("PAYMENT_DELAY_MIN_MS", 50_u64);
        let delay_max_ms = env_or("PAYMENT_DELAY_MAX_MS", 200_u64).max(delay_min_ms);

        Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("PAYMENT_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("PAYMENT_SERVICE_PORT", 8082_u16),
            },
            payment: PaymentConfig {
                decline_rate,
                delay_min_ms,
                delay_max_ms,
            },
            telemetry: TelemetryConfig {
                trace_collector_url: std::env::var("TRACE_COLLECTOR_URL")
                    .unwrap_or_else(|_| "http://localhost:14268/api/traces".to_string()),
            },
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
