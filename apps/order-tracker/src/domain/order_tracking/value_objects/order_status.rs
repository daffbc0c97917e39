//! Market-relative status of a tracked order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a tracked order stands against the competing best price.
///
/// ```text
/// Unknown ──(first classification)──> Top | Matched | Undercut
/// Top <──> Matched <──> Undercut <──> Top   (driven by each snapshot)
/// ```
///
/// Transition detection compares variants only; see [`OrderStatus::same_variant`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// No market comparison performed yet.
    #[default]
    Unknown,
    /// At or better than the best competing price.
    Top,
    /// Tied with the best price while other orders share that level.
    Matched,
    /// A competing order is strictly better by `amount` per unit (always > 0).
    Undercut {
        /// Price-per-unit gap to the better order.
        amount: f64,
    },
}

impl OrderStatus {
    /// True if both statuses are the same variant, ignoring the undercut amount.
    ///
    /// Two `Undercut` states with different amounts count as the same status,
    /// so a widening undercut does not re-notify.
    #[must_use]
    pub const fn same_variant(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Unknown, Self::Unknown)
                | (Self::Top, Self::Top)
                | (Self::Matched, Self::Matched)
                | (Self::Undercut { .. }, Self::Undercut { .. })
        )
    }

    /// True until the order has been classified against a snapshot.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The undercut gap, if any.
    #[must_use]
    pub const fn undercut_amount(&self) -> Option<f64> {
        match self {
            Self::Undercut { amount } => Some(*amount),
            Self::Unknown | Self::Top | Self::Matched => None,
        }
    }

    /// Stable lowercase label (metrics tags, logs).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Top => "top",
            Self::Matched => "matched",
            Self::Undercut { .. } => "undercut",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Top => write!(f, "Top"),
            Self::Matched => write!(f, "Matched"),
            Self::Undercut { .. } => write!(f, "Undercut"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_variant_ignores_undercut_amount() {
        let a = OrderStatus::Undercut { amount: 1.0 };
        let b = OrderStatus::Undercut { amount: 250.5 };
        assert!(a.same_variant(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn same_variant_distinguishes_variants() {
        assert!(OrderStatus::Top.same_variant(&OrderStatus::Top));
        assert!(!OrderStatus::Top.same_variant(&OrderStatus::Matched));
        assert!(!OrderStatus::Unknown.same_variant(&OrderStatus::Top));
        assert!(!OrderStatus::Matched.same_variant(&OrderStatus::Undercut { amount: 1.0 }));
    }

    #[test]
    fn default_is_unknown() {
        assert!(OrderStatus::default().is_unknown());
    }

    #[test]
    fn undercut_amount_only_for_undercut() {
        assert_eq!(
            OrderStatus::Undercut { amount: 5.0 }.undercut_amount(),
            Some(5.0)
        );
        assert_eq!(OrderStatus::Top.undercut_amount(), None);
    }

    #[test]
    fn display_hides_amount() {
        assert_eq!(OrderStatus::Undercut { amount: 3.0 }.to_string(), "Undercut");
        assert_eq!(OrderStatus::Matched.to_string(), "Matched");
    }

    #[test]
    fn serde_tagged() {
        let json = serde_json::to_string(&OrderStatus::Undercut { amount: 5.0 }).unwrap();
        assert_eq!(json, r#"{"status":"UNDERCUT","amount":5.0}"#);

        let parsed: OrderStatus = serde_json::from_str(r#"{"status":"TOP"}"#).unwrap();
        assert_eq!(parsed, OrderStatus::Top);
    }
}
