//! Order side (buy or sell).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy order.
    Buy,
    /// Sell offer.
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Label used in user-facing messages.
    #[must_use]
    pub const fn order_label(&self) -> &'static str {
        match self {
            Self::Buy => "Buy order",
            Self::Sell => "Sell offer",
        }
    }

    /// True when `candidate` is a strictly better price than `reference`
    /// from the point of view of an order on this side.
    ///
    /// A higher bid outranks a lower one; a lower ask outranks a higher one.
    #[must_use]
    pub fn outranks(&self, candidate: f64, reference: f64) -> bool {
        match self {
            Self::Buy => candidate > reference,
            Self::Sell => candidate < reference,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn order_side_outranks() {
        assert!(OrderSide::Buy.outranks(101.0, 100.0));
        assert!(!OrderSide::Buy.outranks(100.0, 100.0));
        assert!(OrderSide::Sell.outranks(99.0, 100.0));
        assert!(!OrderSide::Sell.outranks(101.0, 100.0));
    }

    #[test]
    fn order_side_display() {
        assert_eq!(format!("{}", OrderSide::Buy), "BUY");
        assert_eq!(format!("{}", OrderSide::Sell), "SELL");
    }

    #[test]
    fn order_side_serde() {
        let json = serde_json::to_string(&OrderSide::Buy).unwrap();
        assert_eq!(json, "\"BUY\"");

        let parsed: OrderSide = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(parsed, OrderSide::Sell);
    }
}
