//! Coin value tied up in the panel's orders.

use serde::{Deserialize, Serialize};

use super::reconciler::SyncResult;
use crate::domain::order_tracking::signals::PanelOrderInfo;
use crate::domain::order_tracking::value_objects::OrderSide;

/// Totals derived from one panel scrape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderValueSummary {
    /// Coins reserved by the unfilled part of buy orders.
    pub locked_in_buy_orders: f64,
    /// Worth of bought items waiting to be claimed.
    pub items_from_buy_orders: f64,
    /// Coins from sold items waiting to be claimed.
    pub coins_from_sell_offers: f64,
    /// Worth of items still listed in sell offers.
    pub pending_sell_offers: f64,
    /// Sum of the above.
    pub total: f64,
}

impl OrderValueSummary {
    /// Aggregate both partitions of a sync.
    #[must_use]
    pub fn from_sync(result: &SyncResult) -> Self {
        let mut summary = Self::default();

        for entry in &result.unfilled {
            summary.add_unfilled(entry);
            summary.add_unclaimed(entry);
        }
        for entry in &result.filled {
            summary.add_unclaimed(entry);
        }

        summary.total = summary.locked_in_buy_orders
            + summary.items_from_buy_orders
            + summary.coins_from_sell_offers
            + summary.pending_sell_offers;
        summary
    }

    fn add_unfilled(&mut self, entry: &PanelOrderInfo) {
        let value = f64::from(entry.unfilled_volume()) * entry.price_per_unit;
        match entry.side {
            OrderSide::Buy => self.locked_in_buy_orders += value,
            OrderSide::Sell => self.pending_sell_offers += value,
        }
    }

    fn add_unclaimed(&mut self, entry: &PanelOrderInfo) {
        match entry.side {
            OrderSide::Buy => {
                self.items_from_buy_orders += f64::from(entry.unclaimed) * entry.price_per_unit;
            }
            OrderSide::Sell => self.coins_from_sell_offers += f64::from(entry.unclaimed),
        }
    }
}
