//! Order Tracking Domain Services
//!
//! Stateless business logic that doesn't fit in the entity.

mod notification_policy;
mod order_value;
mod reconciler;
mod status_evaluator;

pub use notification_policy::NotificationPolicy;
pub use order_value::OrderValueSummary;
pub use reconciler::{PanelReconciler, Reconciliation, SyncResult};
pub use status_evaluator::StatusEvaluator;
