//! Property-based tests for panel reconciliation.
//!
//! Scrapes are drawn from a tiny product/price/volume space so identity
//! collisions and duplicate entries are common.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;

use order_tracker::{
    ManualClock, OrderSide, OrderTracker, PanelOrderInfo, ProductCatalog, RecordingListener,
    TrackerConfig,
};

fn entry_strategy() -> impl Strategy<Value = PanelOrderInfo> {
    (
        prop::sample::select(vec!["Foo", "Bar"]),
        prop::bool::ANY,
        1u32..3,
        prop::sample::select(vec![1.0f64, 2.5]),
        prop::bool::weighted(0.2),
        prop::option::of(0u32..28),
    )
        .prop_map(|(name, buy, volume, price, filled, slot)| PanelOrderInfo {
            product_name: name.to_string(),
            side: if buy { OrderSide::Buy } else { OrderSide::Sell },
            volume,
            price_per_unit: price,
            filled,
            panel_slot: slot,
            filled_amount: 0,
            unclaimed: 0,
        })
}

fn key(name: &str, side: OrderSide, volume: u32, price: f64) -> (String, bool, u32, u64) {
    (name.to_string(), side == OrderSide::Buy, volume, price.to_bits())
}

fn tracker() -> (OrderTracker, RecordingListener) {
    let mut tracker = OrderTracker::new(
        &TrackerConfig::default(),
        ProductCatalog::new(),
        Arc::new(ManualClock::at_millis(0)),
    )
    .unwrap();
    let recorder = RecordingListener::new();
    tracker.add_listener(recorder.clone());
    (tracker, recorder)
}

proptest! {
    /// |after| = |before| - removed + added, and the tracked multiset equals
    /// the scrape's unfilled multiset.
    #[test]
    fn reconciliation_conserves_orders(
        first in prop::collection::vec(entry_strategy(), 0..12),
        second in prop::collection::vec(entry_strategy(), 0..12),
    ) {
        let (mut tracker, recorder) = tracker();
        tracker.sync_panel(first);
        let before = tracker.tracked_orders().len();
        recorder.take();

        let result = tracker.sync_panel(second.clone());

        let removed = recorder.count("ORDER_REMOVED");
        let added = recorder.count("ORDER_ADDED");
        prop_assert_eq!(tracker.tracked_orders().len(), before - removed + added);

        let mut tracked: Vec<_> = tracker
            .tracked_orders()
            .iter()
            .map(|o| key(&o.product_name, o.side, o.volume, o.price_per_unit))
            .collect();
        let mut unfilled: Vec<_> = result
            .unfilled
            .iter()
            .map(|e| key(&e.product_name, e.side, e.volume, e.price_per_unit))
            .collect();
        tracked.sort();
        unfilled.sort();
        prop_assert_eq!(tracked, unfilled);

        prop_assert_eq!(result.unfilled.len() + result.filled.len(), second.len());
    }

    /// Replaying the same scrape changes nothing.
    #[test]
    fn repeated_scrape_is_a_no_op(
        scrape in prop::collection::vec(entry_strategy(), 0..12),
    ) {
        let (mut tracker, recorder) = tracker();
        tracker.sync_panel(scrape.clone());
        let ids: Vec<_> = tracker.tracked_orders().iter().map(|o| o.id).collect();
        recorder.take();

        tracker.sync_panel(scrape);

        prop_assert!(recorder.events().is_empty());
        let after: Vec<_> = tracker.tracked_orders().iter().map(|o| o.id).collect();
        prop_assert_eq!(ids, after);
    }
}
