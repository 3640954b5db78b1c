//! Domain metrics for gateway-service.

use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry};

/// Checkout outcome counters and full-chain roundtrip latency, registered
/// on the service telemetry registry.
#[derive(Clone)]
pub struct GatewayMetrics {
    /// Checkout requests segmented by downstream outcome.
    pub checkouts_total: IntCounterVec,
    /// Roundtrip duration of the whole order/payment chain.
    pub checkout_duration_seconds: Histogram,
}

impl GatewayMetrics {
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let checkouts_total = IntCounterVec::new(
            Opts::new(
                "checkout_requests_total",
                "Checkout requests segmented by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(checkouts_total.clone()))?;

        let checkout_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "checkout_duration_seconds",
            "Roundtrip duration of the order/payment chain",
        ))?;
        registry.register(Box::new(checkout_duration_seconds.clone()))?;

        Ok(Self {
            checkouts_total,
            checkout_duration_seconds,
        })
    }

    /// Record one checkout with its downstream outcome.
    pub fn record(&self, outcome: &str, seconds: f64) {
        self.checkouts_total.with_label_values(&[outcome]).inc();
        self.checkout_duration_seconds.observe(seconds);
    }
}
