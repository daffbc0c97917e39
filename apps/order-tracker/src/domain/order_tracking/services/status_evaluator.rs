//! Status evaluator.
//!
//! Classifies a tracked order against the best level of the competing
//! summary in a market snapshot.

use tracing::{debug, warn};

use crate::domain::market::{MarketSnapshot, PriceLevel};
use crate::domain::order_tracking::aggregate::TrackedOrder;
use crate::domain::order_tracking::value_objects::{OrderSide, OrderStatus};
use crate::domain::shared::ProductCatalog;

/// Stateless status classification.
pub struct StatusEvaluator;

impl StatusEvaluator {
    /// Compute the status of `order` against `snapshot`.
    ///
    /// Returns `None` when the product name has no id, the id is absent from
    /// the snapshot, or the competing summary is empty. The order then keeps
    /// its last known status.
    #[must_use]
    pub fn evaluate(
        order: &TrackedOrder,
        catalog: &ProductCatalog,
        snapshot: &MarketSnapshot,
    ) -> Option<OrderStatus> {
        let Some(product_id) = catalog.name_to_id(&order.product_name) else {
            warn!(product = %order.product_name, "No product id for tracked order");
            return None;
        };

        let Some(quote) = snapshot.product(product_id) else {
            warn!(product = %order.product_name, product_id, "Product missing from snapshot");
            return None;
        };

        let status = Self::classify(
            order.side,
            order.price_per_unit,
            quote.competing_levels(order.side),
        );
        if status.is_none() {
            debug!(
                product = %order.product_name,
                side = %order.side,
                "Could not classify order, competing summary is empty"
            );
        }
        status
    }

    /// Classify `price` on `side` against best-first competing `levels`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn classify(side: OrderSide, price: f64, levels: &[PriceLevel]) -> Option<OrderStatus> {
        let best = levels.first()?;
        let best_price = best.price_per_unit;

        if price == best_price {
            return Some(if best.order_count > 1 {
                OrderStatus::Matched
            } else {
                OrderStatus::Top
            });
        }

        if side.outranks(price, best_price) {
            return Some(OrderStatus::Top);
        }

        let amount = match side {
            OrderSide::Buy => best_price - price,
            OrderSide::Sell => price - best_price,
        };
        Some(OrderStatus::Undercut { amount })
    }

    /// Store `computed` on `order` if its variant differs from the current one.
    ///
    /// Returns the previous status when a change was applied. A new undercut
    /// amount alone is not a change and leaves the stored amount untouched.
    pub fn transition(order: &mut TrackedOrder, computed: OrderStatus) -> Option<OrderStatus> {
        if order.status.same_variant(&computed) {
            return None;
        }
        let previous = order.status;
        order.status = computed;
        Some(previous)
    }
}
