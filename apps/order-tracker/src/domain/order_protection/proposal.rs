//! Orders awaiting the user's final confirmation.

use serde::{Deserialize, Serialize};

use crate::domain::order_tracking::{OrderSide, OutstandingOrder};

/// A fully specified order that has not been submitted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProposal {
    /// Product display name.
    pub product_name: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Order volume.
    pub volume: u32,
    /// Proposed price per unit.
    pub price_per_unit: f64,
    /// Rounded order total as displayed.
    pub total: f64,
}

impl OrderProposal {
    /// Create a proposal.
    #[must_use]
    pub fn new(
        product_name: impl Into<String>,
        side: OrderSide,
        volume: u32,
        price_per_unit: f64,
        total: f64,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            side,
            volume,
            price_per_unit,
            total,
        }
    }
}

impl From<OrderProposal> for OutstandingOrder {
    fn from(proposal: OrderProposal) -> Self {
        Self::new(
            proposal.product_name,
            proposal.side,
            proposal.volume,
            proposal.price_per_unit,
            proposal.total,
        )
    }
}
