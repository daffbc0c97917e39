//! Inputs handed to the tracker by its external collaborators.
//!
//! Each record arrives already parsed from its raw source (panel scrape,
//! placement action, chat line). None of them are authoritative on their own.

use serde::{Deserialize, Serialize};

use super::value_objects::{OrderIdentity, OrderSide};
use crate::domain::shared::Timestamp;
use crate::store::Timestamped;

/// One order as seen in a point-in-time scrape of the order panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelOrderInfo {
    /// Product display name.
    pub product_name: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Ordered volume.
    pub volume: u32,
    /// Price per unit.
    pub price_per_unit: f64,
    /// True once the order reached 100% fill.
    pub filled: bool,
    /// Slot the order occupies in the panel.
    pub panel_slot: Option<u32>,
    /// Units filled so far.
    #[serde(default)]
    pub filled_amount: u32,
    /// Unclaimed proceeds: items for buy orders, coins for sell offers.
    #[serde(default)]
    pub unclaimed: u32,
}

impl PanelOrderInfo {
    /// Identity tuple of this entry.
    #[must_use]
    pub fn identity(&self) -> OrderIdentity {
        OrderIdentity::new(
            self.product_name.clone(),
            self.side,
            self.volume,
            self.price_per_unit,
        )
    }

    /// Volume still waiting to fill.
    #[must_use]
    pub const fn unfilled_volume(&self) -> u32 {
        self.volume.saturating_sub(self.filled_amount)
    }
}

/// An order the user just placed, waiting for its confirmation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutstandingOrder {
    /// Product display name.
    pub product_name: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Ordered volume.
    pub volume: u32,
    /// Price per unit.
    pub price_per_unit: f64,
    /// Rounded order total, as the confirmation message will print it.
    pub total: f64,
    /// When the placement completed. Overwritten by the staging store.
    #[serde(default = "unstaged")]
    pub created_at: Timestamp,
}

impl OutstandingOrder {
    /// Create an outstanding order; `created_at` is set when it is staged.
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
            created_at: unstaged(),
        }
    }

    /// True if a confirmation message describes this placement.
    ///
    /// Product names compare with full Unicode case folding; the total
    /// compares exactly because both sides round it the same way.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, event: &ConfirmationEvent) -> bool {
        self.side == event.side
            && self.volume == event.volume
            && self.total == event.total
            && eq_ignore_case(&self.product_name, &event.product_name)
    }
}

fn unstaged() -> Timestamp {
    Timestamp::from_unix_millis(0)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl Timestamped for OutstandingOrder {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn set_created_at(&mut self, at: Timestamp) {
        self.created_at = at;
    }
}

/// "Order placed" confirmation parsed from a system message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationEvent {
    /// Product display name, as printed.
    pub product_name: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Ordered volume.
    pub volume: u32,
    /// Rounded order total.
    pub total: f64,
}

/// "Order filled" notice parsed from a system message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillEvent {
    /// Product display name.
    pub product_name: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Filled volume.
    pub volume: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outstanding() -> OutstandingOrder {
        OutstandingOrder::new("Enchanted Diamond", OrderSide::Buy, 64, 1_000.0, 64_000.0)
    }

    fn confirmation(name: &str, total: f64) -> ConfirmationEvent {
        ConfirmationEvent {
            product_name: name.to_string(),
            side: OrderSide::Buy,
            volume: 64,
            total,
        }
    }

    #[test]
    fn confirmation_matches_case_insensitively() {
        assert!(outstanding().matches(&confirmation("enchanted DIAMOND", 64_000.0)));
    }

    #[test]
    fn confirmation_matches_non_ascii_case_insensitively() {
        let staged =
            OutstandingOrder::new("Élytra Ångström", OrderSide::Buy, 64, 1_000.0, 64_000.0);
        assert!(staged.matches(&confirmation("élytra ÅNGSTRÖM", 64_000.0)));
        assert!(!staged.matches(&confirmation("elytra angstrom", 64_000.0)));
    }

    #[test]
    fn deserialized_outstanding_order_defaults_to_epoch() {
        let order: OutstandingOrder = serde_json::from_str(
            r#"{"product_name":"Enchanted Diamond","side":"BUY","volume":64,"price_per_unit":1000.0,"total":64000.0}"#,
        )
        .unwrap();
        assert_eq!(order.created_at.unix_millis(), 0);
    }

    #[test]
    fn confirmation_total_must_be_exact() {
        assert!(!outstanding().matches(&confirmation("Enchanted Diamond", 64_000.1)));
    }

    #[test]
    fn confirmation_side_and_volume_must_match() {
        let mut event = confirmation("Enchanted Diamond", 64_000.0);
        event.side = OrderSide::Sell;
        assert!(!outstanding().matches(&event));

        let mut event = confirmation("Enchanted Diamond", 64_000.0);
        event.volume = 63;
        assert!(!outstanding().matches(&event));
    }

    #[test]
    fn panel_unfilled_volume_saturates() {
        let info = PanelOrderInfo {
            product_name: "Booster Cookie".to_string(),
            side: OrderSide::Sell,
            volume: 10,
            price_per_unit: 5.0,
            filled: false,
            panel_slot: Some(3),
            filled_amount: 12,
            unclaimed: 0,
        };
        assert_eq!(info.unfilled_volume(), 0);
    }

    #[test]
    fn panel_info_optional_amounts_default() {
        let info: PanelOrderInfo = serde_json::from_str(
            r#"{"product_name":"Booster Cookie","side":"SELL","volume":1,"price_per_unit":5.0,"filled":false,"panel_slot":null}"#,
        )
        .unwrap();
        assert_eq!(info.filled_amount, 0);
        assert_eq!(info.unclaimed, 0);
    }
}
