//! Pre-submission price checks.
//!
//! The validator is pure: it reads the catalog and snapshot and never
//! mutates anything, so callers may re-run it every frame while a
//! confirmation screen is open.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::proposal::OrderProposal;
use crate::domain::market::MarketSnapshot;
use crate::domain::order_tracking::OrderSide;
use crate::domain::shared::{ProductCatalog, format_decimal};

/// Outcome of validating one proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True if submission should be blocked.
    pub blocked: bool,
    /// Human-readable reason, present when blocked.
    pub reason: Option<String>,
}

impl ValidationResult {
    /// Submission allowed.
    #[must_use]
    pub const fn allowed() -> Self {
        Self {
            blocked: false,
            reason: None,
        }
    }

    /// Submission blocked for `reason`.
    #[must_use]
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            blocked: true,
            reason: Some(reason.into()),
        }
    }
}

/// What the caller should do with a validated proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionDecision {
    /// Nothing wrong with the proposal.
    Allow,
    /// Blocked, but the user is holding the override.
    Overridden {
        /// Why it would have been blocked.
        reason: Option<String>,
    },
    /// Do not submit.
    Block {
        /// Why it is blocked.
        reason: Option<String>,
    },
}

impl SubmissionDecision {
    /// True unless the decision is `Block`.
    #[must_use]
    pub const fn may_submit(&self) -> bool {
        !matches!(self, Self::Block { .. })
    }
}

/// Apply the caller's override to a validation result.
#[must_use]
pub fn decide_submission(result: ValidationResult, override_active: bool) -> SubmissionDecision {
    match (result.blocked, override_active) {
        (false, _) => SubmissionDecision::Allow,
        (true, true) => SubmissionDecision::Overridden {
            reason: result.reason,
        },
        (true, false) => SubmissionDecision::Block {
            reason: result.reason,
        },
    }
}

/// Blocks proposals that cross the book or undercut the same side too far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderProtectionValidator {
    /// Master switch.
    pub enabled: bool,
    /// Block prices that would fill instantly against the opposing side.
    pub block_undercut_of_opposing: bool,
    /// Block undercuts of the same side at or beyond the max percentage.
    pub block_undercut_percentage: bool,
    /// Max percentage a buy order may overbid the best buy order.
    pub max_buy_undercut_pct: f64,
    /// Max percentage a sell offer may undercut the best sell offer.
    pub max_sell_undercut_pct: f64,
}

impl Default for OrderProtectionValidator {
    fn default() -> Self {
        Self {
            enabled: true,
            block_undercut_of_opposing: true,
            block_undercut_percentage: true,
            max_buy_undercut_pct: 15.0,
            max_sell_undercut_pct: 15.0,
        }
    }
}

impl OrderProtectionValidator {
    /// Validate a proposal against the market.
    ///
    /// Unknown products and missing prices are allowed.
    #[must_use]
    pub fn validate(
        &self,
        proposal: &OrderProposal,
        catalog: &ProductCatalog,
        snapshot: &MarketSnapshot,
    ) -> ValidationResult {
        if !self.enabled {
            return ValidationResult::allowed();
        }

        let Some(product_id) = catalog.name_to_id(&proposal.product_name) else {
            trace!(product = %proposal.product_name, "No product id, allowing order");
            return ValidationResult::allowed();
        };

        self.check_prices(
            proposal.side,
            proposal.price_per_unit,
            snapshot.best_buy_price(product_id),
            snapshot.best_sell_price(product_id),
        )
    }

    /// Core rule set over already-resolved best prices.
    #[must_use]
    pub fn check_prices(
        &self,
        side: OrderSide,
        price: f64,
        best_buy: Option<f64>,
        best_sell: Option<f64>,
    ) -> ValidationResult {
        if !self.enabled {
            return ValidationResult::allowed();
        }

        match side {
            OrderSide::Sell => {
                if let Some(best_buy) = best_buy
                    && self.block_undercut_of_opposing
                    && price <= best_buy
                {
                    return ValidationResult::blocked(format!(
                        "Your Sell Offer price of ({}) is \nbelow the insta sell price of ({})",
                        format_decimal(price, 1),
                        format_decimal(best_buy, 1)
                    ));
                }

                if let Some(best_sell) = best_sell
                    && self.block_undercut_percentage
                {
                    let pct = (best_sell - price) / best_sell * 100.0;
                    if pct >= self.max_sell_undercut_pct {
                        return Self::undercut_block(pct, self.max_sell_undercut_pct);
                    }
                }
            }
            OrderSide::Buy => {
                if let Some(best_sell) = best_sell
                    && self.block_undercut_of_opposing
                    && price >= best_sell
                {
                    return ValidationResult::blocked(format!(
                        "Your Buy Order price of ({}) is \nabove the insta buy price of ({})",
                        format_decimal(price, 1),
                        format_decimal(best_sell, 1)
                    ));
                }

                if let Some(best_buy) = best_buy
                    && self.block_undercut_percentage
                {
                    let pct = (price - best_buy) / best_buy * 100.0;
                    if pct >= self.max_buy_undercut_pct {
                        return Self::undercut_block(pct, self.max_buy_undercut_pct);
                    }
                }
            }
        }

        ValidationResult::allowed()
    }

    fn undercut_block(pct: f64, max: f64) -> ValidationResult {
        ValidationResult::blocked(format!(
            "Undercuts by {}% (max {}%)",
            format_decimal(pct, 1),
            format_decimal(max, 1)
        ))
    }
}
