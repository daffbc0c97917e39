//! Order identity and tracked-order handles.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::OrderSide;

/// The tuple that decides whether two records describe the same order.
///
/// Price is compared exactly; volumes are integral. Panel placement and
/// status are deliberately not part of identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIdentity {
    /// Product display name.
    pub product_name: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Ordered volume.
    pub volume: u32,
    /// Price per unit.
    pub price_per_unit: f64,
}

impl OrderIdentity {
    /// Create a new identity.
    #[must_use]
    pub fn new(
        product_name: impl Into<String>,
        side: OrderSide,
        volume: u32,
        price_per_unit: f64,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            side,
            volume,
            price_per_unit,
        }
    }

    /// Exact identity comparison against loose fields.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, product_name: &str, side: OrderSide, volume: u32, price: f64) -> bool {
        self.product_name == product_name
            && self.side == side
            && self.volume == volume
            && self.price_per_unit == price
    }
}

impl fmt::Display for OrderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x {} @ {}",
            self.side, self.volume, self.product_name, self.price_per_unit
        )
    }
}

/// Handle that tells tracked orders apart, including identity duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackedOrderId(Uuid);

impl TrackedOrderId {
    /// Generate a fresh handle.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TrackedOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
