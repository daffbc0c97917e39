//! Order Tracking Bounded Context
//!
//! Keeps one record per live order and tags it with a market-relative status.
//!
//! # Overview
//!
//! - **Aggregate**: [`TrackedOrder`]
//! - **Value objects**: side, status, identity tuple, tracked-order handle
//! - **Signals**: panel entries, staged placements, confirmation and fill messages
//! - **Events**: [`TrackerEvent`]
//! - **Services**: status evaluation, panel reconciliation, notification policy

pub mod aggregate;
pub mod events;
pub mod services;
pub mod signals;
pub mod value_objects;

pub use aggregate::TrackedOrder;
pub use events::{
    AddSource, GotoAction, OrderAdded, OrderAlert, OrderRemoved, RemovalReason, StatusChanged,
    TrackerEvent,
};
pub use services::{
    NotificationPolicy, OrderValueSummary, PanelReconciler, Reconciliation, StatusEvaluator,
    SyncResult,
};
pub use signals::{ConfirmationEvent, FillEvent, OutstandingOrder, PanelOrderInfo};
pub use value_objects::{OrderIdentity, OrderSide, OrderStatus, TrackedOrderId};
