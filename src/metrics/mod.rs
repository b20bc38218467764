// Private module declaration
mod server;

use prometheus::{Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry};

// Re-export for public API
pub use server::metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order intake outcomes and latency
// - Notification fan-out (published, dropped, live subscribers)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Intake Metrics
    pub orders_submitted: IntCounterVec,
    pub intake_duration: Histogram,

    // Notification Metrics
    pub notifications_published: IntCounterVec,
    pub notifications_dropped: IntCounterVec,
    pub subscribers: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_submitted = IntCounterVec::new(
            Opts::new("orders_submitted_total", "Order submissions by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(orders_submitted.clone()))?;

        let intake_duration = Histogram::with_opts(
            HistogramOpts::new("order_intake_duration_seconds", "End-to-end order intake duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(intake_duration.clone()))?;

        let notifications_published = IntCounterVec::new(
            Opts::new("notifications_published_total", "Order events handed to the fan-out"),
            &["event"],
        )?;
        registry.register(Box::new(notifications_published.clone()))?;

        let notifications_dropped = IntCounterVec::new(
            Opts::new("notifications_dropped_total", "Notifications not delivered to a subscriber"),
            &["reason"],
        )?;
        registry.register(Box::new(notifications_dropped.clone()))?;

        let subscribers = IntGauge::new(
            "notification_subscribers",
            "Currently connected notification subscribers",
        )?;
        registry.register(Box::new(subscribers.clone()))?;

        Ok(Self {
            registry,
            orders_submitted,
            intake_duration,
            notifications_published,
            notifications_dropped,
            subscribers,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record one intake attempt
    pub fn record_intake(&self, outcome: &str, duration_secs: f64) {
        self.orders_submitted.with_label_values(&[outcome]).inc();
        self.intake_duration.observe(duration_secs);
    }

    pub fn record_notification_published(&self, event: &str) {
        self.notifications_published.with_label_values(&[event]).inc();
    }

    pub fn record_notification_dropped(&self, reason: &str) {
        self.notifications_dropped.with_label_values(&[reason]).inc();
    }

    pub fn set_subscribers(&self, count: usize) {
        self.subscribers.set(count as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        // Vec metrics only appear once a label set has been touched
        assert!(metrics.registry.gather().len() >= 2);
    }

    #[test]
    fn test_record_intake() {
        let metrics = Metrics::new().unwrap();
        metrics.record_intake("created", 0.02);
        metrics.record_intake("created", 0.03);
        metrics.record_intake("customer_not_found", 0.01);

        let gathered = metrics.registry.gather();
        let submitted = gathered.iter().find(|m| m.name() == "orders_submitted_total").unwrap();
        assert_eq!(submitted.metric.len(), 2);

        assert_eq!(metrics.orders_submitted.with_label_values(&["created"]).get(), 2);
        assert_eq!(metrics.intake_duration.get_sample_count(), 3);
    }

    #[test]
    fn test_notification_metrics() {
        let metrics = Metrics::new().unwrap();
        metrics.record_notification_published("order.created");
        metrics.record_notification_dropped("queue_full");
        metrics.set_subscribers(3);

        assert_eq!(
            metrics.notifications_published.with_label_values(&["order.created"]).get(),
            1
        );
        assert_eq!(metrics.notifications_dropped.with_label_values(&["queue_full"]).get(), 1);
        assert_eq!(metrics.subscribers.get(), 3);
    }
}
