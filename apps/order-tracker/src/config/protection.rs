//! Pre-submission price protection.

use serde::{Deserialize, Serialize};

use super::notifications::default_true;
use crate::domain::order_protection::OrderProtectionValidator;

/// Order protection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionConfig {
    /// Master switch.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Block prices that cross the opposing best price.
    #[serde(default = "default_true")]
    pub block_undercut_of_opposing: bool,
    /// Block undercuts beyond the max percentages below.
    #[serde(default = "default_true")]
    pub block_undercut_percentage: bool,
    /// Max percent a buy order may overbid the best buy order.
    #[serde(default = "default_max_undercut_pct")]
    pub max_buy_undercut_pct: f64,
    /// Max percent a sell offer may undercut the best sell offer.
    #[serde(default = "default_max_undercut_pct")]
    pub max_sell_undercut_pct: f64,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            block_undercut_of_opposing: true,
            block_undercut_percentage: true,
            max_buy_undercut_pct: default_max_undercut_pct(),
            max_sell_undercut_pct: default_max_undercut_pct(),
        }
    }
}

impl ProtectionConfig {
    /// Convert to the validator used by the tracker.
    #[must_use]
    pub const fn to_validator(&self) -> OrderProtectionValidator {
        OrderProtectionValidator {
            enabled: self.enabled,
            block_undercut_of_opposing: self.block_undercut_of_opposing,
            block_undercut_percentage: self.block_undercut_percentage,
            max_buy_undercut_pct: self.max_buy_undercut_pct,
            max_sell_undercut_pct: self.max_sell_undercut_pct,
        }
    }
}

const fn default_max_undercut_pct() -> f64 {
    15.0
}
