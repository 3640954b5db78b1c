//! Per-process observability context.
//!
//! Constructed once in `main` and injected into the actix `App`, instead of
//! living in ambient global state. Owns the metric registry and the service
//! identity attached to every request span.

use std::sync::Arc;

use crate::metrics::HttpMetrics;

pub struct Telemetry {
    service: String,
    environment: String,
    trace_collector_url: String,
    http: HttpMetrics,
}

impl Telemetry {
    pub fn new(
        service: &str,
        environment: &str,
        trace_collector_url: &str,
    ) -> Result<Arc<Self>, prometheus::Error> {
        let http = HttpMetrics::new(service)?;
        tracing::info!(
            service,
            environment,
            trace_collector = trace_collector_url,
            "telemetry initialized"
        );
        Ok(Arc::new(Self {
            service: service.to_owned(),
            environment: environment.to_owned(),
            trace_collector_url: trace_collector_url.to_owned(),
            http,
        }))
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn trace_collector_url(&self) -> &str {
        &self.trace_collector_url
    }

    pub fn http(&self) -> &HttpMetrics {
        &self.http
    }

    pub fn registry(&self) -> &prometheus::Registry {
        self.http.registry()
    }

    /// Flush buffered telemetry before process exit. Failures are logged,
    /// never escalated.
    pub fn flush(&self) {
        let families = self.http.registry().gather();
        tracing::info!(
            service = %self.service,
            metric_families = families.len(),
            "telemetry flushed"
        );
    }
}
