//! Prometheus metric families and text exposition.
//!
//! Metric label sets are intentionally bounded: method, matched route
//! pattern, and status class. Per-request values (correlation ids, user
//! ids) must never become labels.

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

use crate::telemetry::Telemetry;

/// Request duration buckets in seconds, 10ms up to 10s.
const DURATION_BUCKETS: &[f64] = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Path label for requests that matched no configured route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// HTTP metric families registered on a dedicated registry carrying the
/// service name as a constant label.
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    pub requests_total: IntCounterVec,
    pub request_duration_seconds: HistogramVec,
    pub requests_in_flight: IntGauge,
}

impl HttpMetrics {
    pub fn new(service: &str) -> Result<Self, prometheus::Error> {
        let mut labels = HashMap::new();
        labels.insert("service".to_owned(), service.to_owned());
        let registry = Registry::new_custom(None, Some(labels))?;

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total completed HTTP requests"),
            &["method", "path", "status_class"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency")
                .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "path", "status_class"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "Requests currently being handled",
        )?;
        registry.register(Box::new(requests_in_flight.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            requests_in_flight,
        })
    }

    /// Registry backing these families; domain metrics register here too.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record the terminal metrics for a completed (not aborted) request.
    pub(crate) fn observe_completed(
        &self,
        method: &str,
        path: &str,
        status_class: &str,
        seconds: f64,
    ) {
        self.requests_total
            .with_label_values(&[method, path, status_class])
            .inc();
        self.request_duration_seconds
            .with_label_values(&[method, path, status_class])
            .observe(seconds);
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<(String, Vec<u8>), prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok((encoder.format_type().to_owned(), buffer))
    }
}

/// Status class label for a status code: "2xx", "4xx", "5xx", ...
pub fn status_class(status: u16) -> &'static str {
    match status / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "unknown",
    }
}

/// Actix handler that renders the telemetry registry snapshot.
pub async fn serve_metrics(telemetry: web::Data<Telemetry>) -> HttpResponse {
    match telemetry.http().encode() {
        Ok((content_type, body)) => HttpResponse::Ok().content_type(content_type).body(body),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_completed_increments_counter_and_histogram() {
        let metrics = HttpMetrics::new("metrics-test").expect("registry");
        metrics.observe_completed("POST", "/api/v1/orders", "2xx", 0.042);
        metrics.observe_completed("POST", "/api/v1/orders", "2xx", 0.084);

        assert_eq!(
            metrics
                .requests_total
                .with_label_values(&["POST", "/api/v1/orders", "2xx"])
                .get(),
            2
        );
        assert_eq!(
            metrics
                .request_duration_seconds
                .with_label_values(&["POST", "/api/v1/orders", "2xx"])
                .get_sample_count(),
            2
        );
    }

    #[test]
    fn exposition_carries_service_label() {
        let metrics = HttpMetrics::new("metrics-test").expect("registry");
        metrics.observe_completed("GET", "/api/v1/chaos", "5xx", 0.01);
        let (content_type, body) = metrics.encode().expect("encode");
        let text = String::from_utf8(body).expect("utf8");

        assert!(content_type.starts_with("text/plain"));
        assert!(text.contains("http_requests_total"));
        assert!(text.contains("http_request_duration_seconds"));
        assert!(text.contains("http_requests_in_flight"));
        assert!(text.contains("service=\"metrics-test\""));
    }

    #[test]
    fn status_classes_are_bounded() {
        assert_eq!(status_class(101), "1xx");
        assert_eq!(status_class(200), "2xx");
        assert_eq!(status_class(204), "2xx");
        assert_eq!(status_class(301), "3xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(500), "5xx");
        assert_eq!(status_class(599), "5xx");
        assert_eq!(status_class(999), "unknown");
    }
}
