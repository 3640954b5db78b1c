//! Structured JSON logging setup.
//!
//! One JSON object per line on stdout; request-span fields (service,
//! environment, correlation id, trace identity, method, path) flatten onto
//! every event emitted while handling that request. The field names are a
//! wire contract with the external log shipper.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the process-wide JSON subscriber. Honors `RUST_LOG`, defaults to
/// `info`. Idempotent: a second call (embedded server, tests) keeps the
/// first subscriber.
pub fn init_tracing(service: &str, environment: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_target(false),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(service, environment, "structured logging initialized");
    }
}

/// Log level for a completed request, derived from its status code.
pub fn level_for_status(status: u16) -> Level {
    match status {
        s if s >= 500 => Level::ERROR,
        s if s >= 400 => Level::WARN,
        _ => Level::INFO,
    }
}
