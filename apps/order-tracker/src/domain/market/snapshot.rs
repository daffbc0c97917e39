//! Market snapshot types.
//!
//! A snapshot is an immutable view of the order book summaries for every
//! product, keyed by product id. Summaries list price levels best-first.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::order_tracking::value_objects::OrderSide;

/// Aggregate of all orders resting at one price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price per unit at this level.
    pub price_per_unit: f64,
    /// Total units resting at this level.
    #[serde(default)]
    pub amount: u64,
    /// Number of distinct orders at this level.
    pub order_count: u32,
}

impl PriceLevel {
    /// Create a price level.
    #[must_use]
    pub const fn new(price_per_unit: f64, amount: u64, order_count: u32) -> Self {
        Self {
            price_per_unit,
            amount,
            order_count,
        }
    }
}

/// Best-first price summaries for both sides of one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuote {
    /// Buy-side levels.
    #[serde(default)]
    pub buy_summary: Vec<PriceLevel>,
    /// Sell-side levels.
    #[serde(default)]
    pub sell_summary: Vec<PriceLevel>,
}

impl ProductQuote {
    /// Levels resting on the given side.
    #[must_use]
    pub fn summary(&self, side: OrderSide) -> &[PriceLevel] {
        match side {
            OrderSide::Buy => &self.buy_summary,
            OrderSide::Sell => &self.sell_summary,
        }
    }

    /// Levels an order on `side` is classified against (the opposite side).
    #[must_use]
    pub fn competing_levels(&self, side: OrderSide) -> &[PriceLevel] {
        self.summary(side.opposite())
    }

    /// Best level on the given side, if any.
    #[must_use]
    pub fn best(&self, side: OrderSide) -> Option<&PriceLevel> {
        self.summary(side).first()
    }
}

/// Point-in-time market view keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Quotes per product id.
    pub products: HashMap<String, ProductQuote>,
}

impl MarketSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_product(mut self, id: impl Into<String>, quote: ProductQuote) -> Self {
        self.products.insert(id.into(), quote);
        self
    }

    /// Quote for a product id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&ProductQuote> {
        self.products.get(id)
    }

    /// Best buy-side price for a product.
    #[must_use]
    pub fn best_buy_price(&self, id: &str) -> Option<f64> {
        self.product(id)
            .and_then(|q| q.best(OrderSide::Buy))
            .map(|level| level.price_per_unit)
    }

    /// Best sell-side price for a product.
    #[must_use]
    pub fn best_sell_price(&self, id: &str) -> Option<f64> {
        self.product(id)
            .and_then(|q| q.best(OrderSide::Sell))
            .map(|level| level.price_per_unit)
    }
}
