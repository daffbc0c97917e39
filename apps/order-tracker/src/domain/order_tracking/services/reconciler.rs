//! Panel reconciliation.
//!
//! Merges a full panel scrape into the tracked-order set. Matching is a
//! greedy multiset match: each tracked order claims the first unconsumed
//! unfilled entry with the same identity tuple, in scrape order. With
//! duplicate identities, which tracked order survives is decided purely by
//! iteration order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::order_tracking::aggregate::TrackedOrder;
use crate::domain::order_tracking::signals::PanelOrderInfo;

/// A panel scrape split by the `filled` flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Entries still waiting to fill, in scrape order.
    pub unfilled: Vec<PanelOrderInfo>,
    /// Entries at 100% fill, in scrape order.
    pub filled: Vec<PanelOrderInfo>,
}

impl SyncResult {
    /// Partition a scrape, preserving order within each half.
    #[must_use]
    pub fn partition(panel: Vec<PanelOrderInfo>) -> Self {
        let (filled, unfilled) = panel.into_iter().partition(|entry| entry.filled);
        Self { unfilled, filled }
    }
}

/// Changes produced by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Tracked orders dropped because the scrape no longer lists them.
    pub removed: Vec<TrackedOrder>,
    /// Orders created from unconsumed unfilled entries.
    pub added: Vec<TrackedOrder>,
    /// The scrape partitions, unchanged.
    pub result: SyncResult,
}

/// Stateless panel reconciler.
pub struct PanelReconciler;

impl PanelReconciler {
    /// Reconcile `tracked` in place against a full panel scrape.
    ///
    /// Surviving orders get their panel slot refreshed. Removed orders are
    /// returned in their tracked order; added orders are appended to
    /// `tracked` in scrape order.
    pub fn reconcile(tracked: &mut Vec<TrackedOrder>, panel: Vec<PanelOrderInfo>) -> Reconciliation {
        let result = SyncResult::partition(panel);
        let mut consumed = vec![false; result.unfilled.len()];
        let mut removed = Vec::new();

        let before = std::mem::take(tracked);
        for mut order in before {
            let claim = result
                .unfilled
                .iter()
                .enumerate()
                .find(|(idx, entry)| !consumed[*idx] && order.matches_panel(entry))
                .map(|(idx, entry)| (idx, entry.panel_slot));

            match claim {
                Some((idx, slot)) => {
                    consumed[idx] = true;
                    order.panel_slot = slot;
                    tracked.push(order);
                }
                None => removed.push(order),
            }
        }

        let added: Vec<TrackedOrder> = result
            .unfilled
            .iter()
            .zip(&consumed)
            .filter(|(_, taken)| !**taken)
            .map(|(entry, _)| TrackedOrder::from_panel(entry))
            .collect();
        tracked.extend(added.iter().cloned());

        debug!(
            unfilled = result.unfilled.len(),
            filled = result.filled.len(),
            removed = removed.len(),
            added = added.len(),
            tracked = tracked.len(),
            "Panel reconciled"
        );

        Reconciliation {
            removed,
            added,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_tracking::value_objects::{OrderSide, OrderStatus};

    fn entry(name: &str, price: f64, slot: u32, filled: bool) -> PanelOrderInfo {
        PanelOrderInfo {
            product_name: name.to_string(),
            side: OrderSide::Buy,
            volume: 64,
            price_per_unit: price,
            filled,
            panel_slot: Some(slot),
            filled_amount: 0,
            unclaimed: 0,
        }
    }

    #[test]
    fn first_sync_adds_every_unfilled_entry() {
        let mut tracked = Vec::new();
        let outcome = PanelReconciler::reconcile(
            &mut tracked,
            vec![
                entry("Foo", 1.0, 10, false),
                entry("Bar", 2.0, 11, true),
                entry("Baz", 3.0, 12, false),
            ],
        );

        assert_eq!(tracked.len(), 2);
        assert_eq!(outcome.added.len(), 2);
        assert!(outcome.removed.is_empty());
        assert_eq!(outcome.result.unfilled.len(), 2);
        assert_eq!(outcome.result.filled.len(), 1);
        assert_eq!(tracked[0].product_name, "Foo");
        assert_eq!(tracked[1].product_name, "Baz");
        assert!(tracked.iter().all(|o| o.status == OrderStatus::Unknown));
    }

    #[test]
    fn kept_order_refreshes_slot_and_keeps_status() {
        let mut order = TrackedOrder::from_panel(&entry("Foo", 1.0, 10, false));
        order.status = OrderStatus::Top;
        let id = order.id;
        let mut tracked = vec![order];

        let outcome = PanelReconciler::reconcile(&mut tracked, vec![entry("Foo", 1.0, 14, false)]);

        assert!(outcome.added.is_empty());
        assert!(outcome.removed.is_empty());
        assert_eq!(tracked[0].id, id);
        assert_eq!(tracked[0].panel_slot, Some(14));
        assert_eq!(tracked[0].status, OrderStatus::Top);
    }

    #[test]
    fn filled_entry_does_not_keep_order() {
        let mut tracked = vec![TrackedOrder::from_panel(&entry("Foo", 1.0, 10, false))];

        let outcome = PanelReconciler::reconcile(&mut tracked, vec![entry("Foo", 1.0, 10, true)]);

        assert!(tracked.is_empty());
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.result.filled.len(), 1);
    }

    #[test]
    fn price_must_match_exactly() {
        let mut tracked = vec![TrackedOrder::from_panel(&entry("Foo", 1.0, 10, false))];

        let outcome =
            PanelReconciler::reconcile(&mut tracked, vec![entry("Foo", 1.000_000_1, 10, false)]);

        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.added.len(), 1);
        assert_eq!(tracked.len(), 1);
    }

    #[test]
    fn duplicate_identity_single_entry_removes_exactly_one() {
        let first = TrackedOrder::from_panel(&entry("Foo", 1.0, 10, false));
        let second = TrackedOrder::from_panel(&entry("Foo", 1.0, 11, false));
        let (first_id, second_id) = (first.id, second.id);
        let mut tracked = vec![first, second];

        let outcome = PanelReconciler::reconcile(&mut tracked, vec![entry("Foo", 1.0, 12, false)]);

        assert_eq!(tracked.len(), 1);
        assert_eq!(outcome.removed.len(), 1);
        assert!(outcome.added.is_empty());
        // First in iteration order claims the entry.
        assert_eq!(tracked[0].id, first_id);
        assert_eq!(outcome.removed[0].id, second_id);
    }

    #[test]
    fn duplicate_entries_add_one_per_unclaimed_copy() {
        let mut tracked = vec![TrackedOrder::from_panel(&entry("Foo", 1.0, 10, false))];

        let outcome = PanelReconciler::reconcile(
            &mut tracked,
            vec![entry("Foo", 1.0, 10, false), entry("Foo", 1.0, 11, false)],
        );

        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.added[0].panel_slot, Some(11));
        assert_eq!(tracked.len(), 2);
    }

    #[test]
    fn empty_scrape_removes_everything() {
        let mut tracked = vec![
            TrackedOrder::from_panel(&entry("Foo", 1.0, 10, false)),
            TrackedOrder::from_panel(&entry("Bar", 2.0, 11, false)),
        ];

        let outcome = PanelReconciler::reconcile(&mut tracked, Vec::new());

        assert!(tracked.is_empty());
        assert_eq!(outcome.removed.len(), 2);
        assert_eq!(outcome.result, SyncResult::default());
    }
}
