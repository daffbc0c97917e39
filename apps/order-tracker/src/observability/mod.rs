//! Observability module for metrics.
//!
//! Logging goes through `tracing` directly; see [`crate::telemetry`] for
//! subscriber setup.

mod metrics;

pub use metrics::{
    MetricsError, init_metrics, record_notification, record_order_added, record_order_removed,
    record_protection_block, record_status_change, record_unmatched_confirmation,
    record_unmatched_fill, update_tracked_orders,
};
