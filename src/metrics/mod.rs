use prometheus::{IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics Module - Prometheus metrics for the order item service
// ============================================================================
//
// Provides counters for:
// - Items created and updated
// - Items priced by the zero-price fallback
// - Failed operations by operation and reason
//
// ============================================================================

pub struct OrderItemMetrics {
    registry: Registry,

    pub items_created: IntCounter,
    pub items_updated: IntCounter,
    pub pricing_fallbacks: IntCounter,
    pub failures: IntCounterVec,
}

impl OrderItemMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let items_created = IntCounter::new(
            "order_items_created_total",
            "Total order items created",
        )?;
        registry.register(Box::new(items_created.clone()))?;

        let items_updated = IntCounter::new(
            "order_items_updated_total",
            "Total order items updated",
        )?;
        registry.register(Box::new(items_updated.clone()))?;

        let pricing_fallbacks = IntCounter::new(
            "pricing_fallbacks_total",
            "Order items priced at zero because pricing failed",
        )?;
        registry.register(Box::new(pricing_fallbacks.clone()))?;

        let failures = IntCounterVec::new(
            Opts::new("order_item_failures_total", "Failed order item operations"),
            &["operation", "reason"],
        )?;
        registry.register(Box::new(failures.clone()))?;

        Ok(Self {
            registry,
            items_created,
            items_updated,
            pricing_fallbacks,
            failures,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_failure(&self, operation: &str, reason: &str) {
        self.failures.with_label_values(&[operation, reason]).inc();
    }

    /// Text exposition format of everything registered
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        Ok(encoder.encode_to_string(&self.registry.gather())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = OrderItemMetrics::new().unwrap();
        assert_eq!(metrics.items_created.get(), 0);
        assert_eq!(metrics.pricing_fallbacks.get(), 0);
    }

    #[test]
    fn test_failure_labels() {
        let metrics = OrderItemMetrics::new().unwrap();
        metrics.record_failure("update_item", "not_found");
        metrics.record_failure("update_item", "not_found");
        metrics.record_failure("update_item", "missing_id");

        assert_eq!(
            metrics.failures.with_label_values(&["update_item", "not_found"]).get(),
            2
        );
        assert_eq!(
            metrics.failures.with_label_values(&["update_item", "missing_id"]).get(),
            1
        );
    }

    #[test]
    fn test_render_contains_counters() {
        let metrics = OrderItemMetrics::new().unwrap();
        metrics.items_created.inc();

        let text = metrics.render().unwrap();
        assert!(text.contains("order_items_created_total 1"));
    }
}
