//! Domain events for order tracking.
//!
//! Every mutation of the tracked-order set is announced through one of
//! these events. Listeners receive them synchronously, in emission order.

use serde::{Deserialize, Serialize};

use super::aggregate::TrackedOrder;
use super::value_objects::{OrderSide, OrderStatus, TrackedOrderId};
use crate::domain::shared::Timestamp;

/// All possible tracker events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerEvent {
    /// A new order started being tracked.
    OrderAdded(OrderAdded),
    /// A tracked order was dropped.
    OrderRemoved(OrderRemoved),
    /// A tracked order moved to a different status variant.
    StatusChanged(StatusChanged),
    /// A status change passed the notification policy.
    Alert(OrderAlert),
}

impl TrackerEvent {
    /// Handle of the order this event concerns.
    #[must_use]
    pub const fn order_id(&self) -> TrackedOrderId {
        match self {
            Self::OrderAdded(e) => e.order.id,
            Self::OrderRemoved(e) => e.order.id,
            Self::StatusChanged(e) => e.order.id,
            Self::Alert(e) => e.order_id,
        }
    }

    /// When the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::OrderAdded(e) => e.occurred_at,
            Self::OrderRemoved(e) => e.occurred_at,
            Self::StatusChanged(e) => e.occurred_at,
            Self::Alert(e) => e.occurred_at,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::OrderAdded(_) => "ORDER_ADDED",
            Self::OrderRemoved(_) => "ORDER_REMOVED",
            Self::StatusChanged(_) => "STATUS_CHANGED",
            Self::Alert(_) => "ALERT",
        }
    }
}

/// Where a newly tracked order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddSource {
    /// Unmatched entry in a panel scrape.
    Panel,
    /// Outstanding order promoted by its confirmation message.
    Confirmation,
}

impl AddSource {
    /// Lowercase label for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Panel => "panel",
            Self::Confirmation => "confirmation",
        }
    }
}

/// Why a tracked order was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemovalReason {
    /// Absent from the unfilled part of a panel scrape.
    MissingFromPanel,
    /// A fill message named it.
    Filled,
    /// Cleared by a manual reset.
    Reset,
}

impl RemovalReason {
    /// Lowercase label for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingFromPanel => "missing_from_panel",
            Self::Filled => "filled",
            Self::Reset => "reset",
        }
    }
}

/// Event: order added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAdded {
    /// The order as first tracked.
    pub order: TrackedOrder,
    /// Origin of the order.
    pub source: AddSource,
    /// Occurred at.
    pub occurred_at: Timestamp,
}

/// Event: order removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRemoved {
    /// The order as it was when dropped.
    pub order: TrackedOrder,
    /// Why it was dropped.
    pub reason: RemovalReason,
    /// Occurred at.
    pub occurred_at: Timestamp,
}

/// Event: status variant changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChanged {
    /// The order after the change.
    pub order: TrackedOrder,
    /// Status before.
    pub previous: OrderStatus,
    /// Status after.
    pub current: OrderStatus,
    /// Occurred at.
    pub occurred_at: Timestamp,
}

/// Action a user-facing alert offers when clicked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GotoAction {
    /// No click action.
    None,
    /// Open the product's market page.
    Item,
    /// Open the order panel.
    #[default]
    Orders,
}

/// Event: user-facing alert for a status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAlert {
    /// Order the alert is about.
    pub order_id: TrackedOrderId,
    /// Product display name.
    pub product_name: String,
    /// Order side.
    pub side: OrderSide,
    /// Status that triggered the alert.
    pub status: OrderStatus,
    /// Rendered message.
    pub message: String,
    /// Click action, when one applies.
    pub goto: Option<GotoAction>,
    /// Occurred at.
    pub occurred_at: Timestamp,
}
