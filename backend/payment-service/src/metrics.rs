//! Domain metrics for payment-service.

use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry};

/// Payment outcome counters and processing latency, registered on the
/// service telemetry registry.
#[derive(Clone)]
pub struct PaymentMetrics {
    /// Payments processed segmented by business outcome.
    pub payments_total: IntCounterVec,
    /// Simulated processing duration per payment.
    pub processing_duration_seconds: Histogram,
}

impl PaymentMetrics {
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let payments_total = IntCounterVec::new(
            Opts::new(
                "payments_processed_total",
                "Payments processed segmented by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(payments_total.clone()))?;

        let processing_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "payment_processing_duration_seconds",
            "Simulated payment processing duration",
        ))?;
        registry.register(Box::new(processing_duration_seconds.clone()))?;

        Ok(Self {
            payments_total,
            processing_duration_seconds,
        })
    }

    /// Record one processed payment with its business outcome.
    pub fn record(&self, outcome: &str, seconds: f64) {
        self.payments_total.with_label_values(&[outcome]).inc();
        self.processing_duration_seconds.observe(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_counted_independently() {
        let registry = Registry::new();
        let metrics = PaymentMetrics::register(&registry).expect("register");

        metrics.record("approved", 0.1);
        metrics.record("approved", 0.2);
        metrics.record("declined", 0.05);

        assert_eq!(
            metrics.payments_total.with_label_values(&["approved"]).get(),
            2
        );
        assert_eq!(
            metrics.payments_total.with_label_values(&["declined"]).get(),
            1
        );
        assert_eq!(metrics.processing_duration_seconds.get_sample_count(), 3);
    }
}
