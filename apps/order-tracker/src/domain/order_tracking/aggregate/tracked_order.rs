//! Tracked order entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::order_tracking::signals::{OutstandingOrder, PanelOrderInfo};
use crate::domain::order_tracking::value_objects::{
    OrderIdentity, OrderSide, OrderStatus, TrackedOrderId,
};
use crate::domain::shared::format_decimal;

/// One live order the tracker believes exists.
///
/// Created from an unmatched panel entry or a confirmed outstanding order.
/// Status and panel slot are mutated in place; everything else is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedOrder {
    /// Handle distinguishing this order from identity duplicates.
    pub id: TrackedOrderId,
    /// Product display name.
    pub product_name: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Ordered volume.
    pub volume: u32,
    /// Price per unit.
    pub price_per_unit: f64,
    /// Last computed market-relative status.
    pub status: OrderStatus,
    /// Transient panel placement, refreshed by every reconciliation.
    pub panel_slot: Option<u32>,
}

impl TrackedOrder {
    /// Create an order with `Unknown` status.
    #[must_use]
    pub fn new(
        product_name: impl Into<String>,
        side: OrderSide,
        volume: u32,
        price_per_unit: f64,
        panel_slot: Option<u32>,
    ) -> Self {
        Self {
            id: TrackedOrderId::generate(),
            product_name: product_name.into(),
            side,
            volume,
            price_per_unit,
            status: OrderStatus::Unknown,
            panel_slot,
        }
    }

    /// Start tracking an order first seen in the panel.
    #[must_use]
    pub fn from_panel(info: &PanelOrderInfo) -> Self {
        Self::new(
            info.product_name.clone(),
            info.side,
            info.volume,
            info.price_per_unit,
            info.panel_slot,
        )
    }

    /// Promote a confirmed outstanding order. It has no panel slot yet.
    #[must_use]
    pub fn from_outstanding(order: OutstandingOrder) -> Self {
        Self::new(
            order.product_name,
            order.side,
            order.volume,
            order.price_per_unit,
            None,
        )
    }

    /// Identity tuple used for matching.
    #[must_use]
    pub fn identity(&self) -> OrderIdentity {
        OrderIdentity::new(
            self.product_name.clone(),
            self.side,
            self.volume,
            self.price_per_unit,
        )
    }

    /// True if the panel entry describes this same order.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches_panel(&self, info: &PanelOrderInfo) -> bool {
        self.product_name == info.product_name
            && self.side == info.side
            && self.volume == info.volume
            && self.price_per_unit == info.price_per_unit
    }
}

impl fmt::Display for TrackedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} for {}x {} at {} coins",
            self.status,
            self.side.order_label(),
            self.volume,
            self.product_name,
            format_decimal(self.price_per_unit, 1)
        )
    }
}
