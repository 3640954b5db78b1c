//! Domain metrics for order-service.

use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry};

/// Order outcome counters and processing latency, registered on the
/// service telemetry registry.
#[derive(Clone)]
pub struct OrderMetrics {
    /// Orders processed segmented by business outcome.
    pub orders_total: IntCounterVec,
    /// Order processing duration, including the payment call.
    pub processing_duration_seconds: Histogram,
}

impl OrderMetrics {
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let orders_total = IntCounterVec::new(
            Opts::new(
                "orders_processed_total",
                "Orders processed segmented by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(orders_total.clone()))?;

        let processing_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "order_processing_duration_seconds",
            "Order processing duration including the payment call",
        ))?;
        registry.register(Box::new(processing_duration_seconds.clone()))?;

        Ok(Self {
            orders_total,
            processing_duration_seconds,
        })
    }

    /// Record one processed order with its business outcome.
    pub fn record(&self, outcome: &str, seconds: f64) {
        self.orders_total.with_label_values(&[outcome]).inc();
        self.processing_duration_seconds.observe(seconds);
    }
}
