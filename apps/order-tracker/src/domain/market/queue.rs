//! Queue position of a price within a competing summary list.

use serde::{Deserialize, Serialize};

use super::PriceLevel;
use crate::domain::order_tracking::value_objects::OrderSide;

/// How much competition sits strictly ahead of a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuePosition {
    /// Orders at strictly better levels.
    pub orders_ahead: u64,
    /// Units at strictly better levels.
    pub items_ahead: u64,
}

impl QueuePosition {
    /// Walk best-first `levels` and sum everything that outranks `price`
    /// for an order on `side`.
    ///
    /// Returns `None` when nothing is ahead.
    #[must_use]
    pub fn compute(side: OrderSide, price: f64, levels: &[PriceLevel]) -> Option<Self> {
        let mut position = Self {
            orders_ahead: 0,
            items_ahead: 0,
        };

        for level in levels {
            if !side.outranks(level.price_per_unit, price) {
                break;
            }
            position.orders_ahead += u64::from(level.order_count);
            position.items_ahead += level.amount;
        }

        (position.orders_ahead > 0).then_some(position)
    }
}
