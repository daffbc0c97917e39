//! Prometheus metrics for the order tracker.
//!
//! Recording functions are cheap no-ops until a recorder is installed, so
//! the library calls them unconditionally and only the binary decides
//! whether to export.
//!
//! # Example
//!
//! ```ignore
//! use order_tracker::observability::init_metrics;
//!
//! init_metrics("127.0.0.1:9091".parse()?)?;
//! ```

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::domain::order_tracking::{AddSource, OrderSide, OrderStatus, RemovalReason};

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(listen_addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(addr = %listen_addr, "Prometheus metrics exporter started");

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Tracked Order Metrics
// ============================================================================

/// Record a newly tracked order.
pub fn record_order_added(source: AddSource) {
    counter!("tracked_orders_added_total", "source" => source.label()).increment(1);
}

/// Record a dropped tracked order.
pub fn record_order_removed(reason: RemovalReason) {
    counter!("tracked_orders_removed_total", "reason" => reason.label()).increment(1);
}

/// Record a status variant change.
pub fn record_status_change(status: OrderStatus) {
    counter!("order_status_changes_total", "status" => status.label()).increment(1);
}

/// Record an alert that passed the notification policy.
pub fn record_notification(status: OrderStatus) {
    counter!("notifications_total", "status" => status.label()).increment(1);
}

/// Update the tracked orders gauge.
pub fn update_tracked_orders(count: usize) {
    #[allow(clippy::cast_precision_loss)]
    gauge!("tracked_orders").set(count as f64);
}

// ============================================================================
// Resync Signals
// ============================================================================

/// Record a confirmation that matched no staged placement.
pub fn record_unmatched_confirmation() {
    counter!("unmatched_confirmations_total").increment(1);
}

/// Record a fill notice that matched no tracked order.
pub fn record_unmatched_fill() {
    counter!("unmatched_fills_total").increment(1);
}

// ============================================================================
// Protection Metrics
// ============================================================================

/// Record a blocked proposal.
pub fn record_protection_block(side: OrderSide) {
    let side = match side {
        OrderSide::Buy => "buy",
        OrderSide::Sell => "sell",
    };
    counter!("order_protection_blocks_total", "side" => side).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        record_order_added(AddSource::Panel);
        record_order_removed(RemovalReason::Reset);
        record_status_change(OrderStatus::Undercut { amount: 1.0 });
        record_notification(OrderStatus::Top);
        update_tracked_orders(3);
        record_unmatched_confirmation();
        record_unmatched_fill();
        record_protection_block(OrderSide::Sell);
    }
}
