//! Order tracker façade.
//!
//! Owns the tracked-order set, the outstanding store, the product catalog
//! and the last applied snapshot. Every method takes `&mut self`: the
//! tracker is not internally synchronized and expects exactly one writer.
//! Hosts with several producers go through
//! [`TrackerDriver`](super::TrackerDriver).
//!
//! ```text
//! panel scrape ──> sync_panel ──────────┐
//! snapshot ──────> apply_snapshot ──────┼──> tracked orders ──> listeners
//! placement ─────> stage_outstanding    │
//! chat message ──> confirm_outstanding ─┘
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use super::ports::TrackerListener;
use crate::config::TrackerConfig;
use crate::domain::market::{MarketSnapshot, QueuePosition};
use crate::domain::order_protection::{
    OrderProposal, OrderProtectionValidator, SubmissionDecision, ValidationResult,
    decide_submission,
};
use crate::domain::order_tracking::{
    AddSource, ConfirmationEvent, FillEvent, NotificationPolicy, OrderAdded, OrderAlert,
    OrderRemoved, OrderSide, OutstandingOrder, PanelOrderInfo, PanelReconciler, RemovalReason,
    StatusChanged, StatusEvaluator, SyncResult, TrackedOrder, TrackedOrderId, TrackerEvent,
};
use crate::domain::shared::{Clock, ProductCatalog};
use crate::error::{TrackerError, UnmatchedConfirmation, UnmatchedFill};
use crate::observability;
use crate::store::TimedStore;

/// Single source of truth for the trader's live orders.
pub struct OrderTracker {
    tracked: Vec<TrackedOrder>,
    outstanding: TimedStore<OutstandingOrder>,
    catalog: ProductCatalog,
    snapshot: Option<MarketSnapshot>,
    policy: NotificationPolicy,
    validator: OrderProtectionValidator,
    clock: Arc<dyn Clock>,
    listeners: Vec<Box<dyn TrackerListener>>,
}

impl OrderTracker {
    /// Create a tracker from configuration.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidConfig` if the outstanding window is not
    /// positive or a protection threshold is outside `[0, 100]`.
    pub fn new(
        config: &TrackerConfig,
        catalog: ProductCatalog,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TrackerError> {
        let validator = config.protection.to_validator();
        for (name, value) in [
            ("max_buy_undercut_pct", validator.max_buy_undercut_pct),
            ("max_sell_undercut_pct", validator.max_sell_undercut_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(TrackerError::InvalidConfig(format!(
                    "{name} must be between 0 and 100, got {value}"
                )));
            }
        }

        let outstanding = TimedStore::new(config.outstanding.window_ms, Arc::clone(&clock))?;

        Ok(Self {
            tracked: Vec::new(),
            outstanding,
            catalog,
            snapshot: None,
            policy: config.notifications.to_policy(),
            validator,
            clock,
            listeners: Vec::new(),
        })
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Register a listener for every event.
    pub fn add_listener(&mut self, listener: impl TrackerListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Register an already boxed listener.
    pub fn add_boxed_listener(&mut self, listener: Box<dyn TrackerListener>) {
        self.listeners.push(listener);
    }

    /// Register a callback for added orders only.
    pub fn on_order_added<F>(&mut self, mut f: F)
    where
        F: FnMut(&OrderAdded) + Send + 'static,
    {
        self.add_listener(move |event: &TrackerEvent| {
            if let TrackerEvent::OrderAdded(e) = event {
                f(e);
            }
        });
    }

    /// Register a callback for removed orders only.
    pub fn on_order_removed<F>(&mut self, mut f: F)
    where
        F: FnMut(&OrderRemoved) + Send + 'static,
    {
        self.add_listener(move |event: &TrackerEvent| {
            if let TrackerEvent::OrderRemoved(e) = event {
                f(e);
            }
        });
    }

    /// Register a callback for status changes only.
    pub fn on_status_changed<F>(&mut self, mut f: F)
    where
        F: FnMut(&StatusChanged) + Send + 'static,
    {
        self.add_listener(move |event: &TrackerEvent| {
            if let TrackerEvent::StatusChanged(e) = event {
                f(e);
            }
        });
    }

    /// Register a callback for alerts only.
    pub fn on_alert<F>(&mut self, mut f: F)
    where
        F: FnMut(&OrderAlert) + Send + 'static,
    {
        self.add_listener(move |event: &TrackerEvent| {
            if let TrackerEvent::Alert(e) = event {
                f(e);
            }
        });
    }

    fn emit(&mut self, event: &TrackerEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Replace the product name ↔ id mapping.
    pub fn set_catalog(&mut self, catalog: ProductCatalog) {
        debug!(products = catalog.len(), "Product catalog replaced");
        self.catalog = catalog;
    }

    /// Reconcile the tracked set against a fully loaded panel scrape.
    ///
    /// Removals are announced before additions.
    pub fn sync_panel(&mut self, entries: Vec<PanelOrderInfo>) -> SyncResult {
        let outcome = PanelReconciler::reconcile(&mut self.tracked, entries);
        let now = self.clock.now();

        for order in outcome.removed {
            debug!(order = %order, "Order removed");
            observability::record_order_removed(RemovalReason::MissingFromPanel);
            self.emit(&TrackerEvent::OrderRemoved(OrderRemoved {
                order,
                reason: RemovalReason::MissingFromPanel,
                occurred_at: now,
            }));
        }

        for order in outcome.added {
            debug!(order = %order, "Order added");
            observability::record_order_added(AddSource::Panel);
            self.emit(&TrackerEvent::OrderAdded(OrderAdded {
                order,
                source: AddSource::Panel,
                occurred_at: now,
            }));
        }

        observability::update_tracked_orders(self.tracked.len());
        outcome.result
    }

    /// Recompute every order's status against a new snapshot.
    ///
    /// Only variant changes are stored and announced, so applying the same
    /// snapshot twice emits nothing the second time.
    pub fn apply_snapshot(&mut self, snapshot: MarketSnapshot) {
        let now = self.clock.now();
        let mut events = Vec::new();

        for order in &mut self.tracked {
            let Some(computed) = StatusEvaluator::evaluate(order, &self.catalog, &snapshot)
            else {
                continue;
            };
            let Some(previous) = StatusEvaluator::transition(order, computed) else {
                continue;
            };

            debug!(
                product = %order.product_name,
                side = %order.side,
                previous = %previous,
                status = %order.status,
                "Order status changed"
            );
            observability::record_status_change(order.status);
            events.push(TrackerEvent::StatusChanged(StatusChanged {
                order: order.clone(),
                previous,
                current: order.status,
                occurred_at: now,
            }));

            if let Some(alert) = self.policy.alert(order, previous, now) {
                observability::record_notification(alert.status);
                events.push(TrackerEvent::Alert(alert));
            }
        }

        self.snapshot = Some(snapshot);
        for event in &events {
            self.emit(event);
        }
    }

    /// Stage an order the user just placed.
    pub fn stage_outstanding(&mut self, order: OutstandingOrder) {
        debug!(
            product = %order.product_name,
            side = %order.side,
            volume = order.volume,
            total = order.total,
            "Outstanding order staged"
        );
        self.outstanding.add(order);
    }

    /// Promote the staged order described by a confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `UnmatchedConfirmation` when nothing staged within the window
    /// matches. The host should offer a full resync.
    pub fn confirm_outstanding(
        &mut self,
        event: ConfirmationEvent,
    ) -> Result<TrackedOrderId, UnmatchedConfirmation> {
        let Some(staged) = self.outstanding.remove_first_match(|o| o.matches(&event)) else {
            info!(
                product = %event.product_name,
                side = %event.side,
                volume = event.volume,
                total = event.total,
                "Confirmation matched no outstanding order"
            );
            observability::record_unmatched_confirmation();
            return Err(UnmatchedConfirmation { event });
        };

        let order = TrackedOrder::from_outstanding(staged);
        let id = order.id;
        debug!(order = %order, "Outstanding order confirmed");
        self.tracked.push(order.clone());

        observability::record_order_added(AddSource::Confirmation);
        observability::update_tracked_orders(self.tracked.len());
        self.emit(&TrackerEvent::OrderAdded(OrderAdded {
            order,
            source: AddSource::Confirmation,
            occurred_at: self.clock.now(),
        }));
        Ok(id)
    }

    /// Drop the tracked order a fill message refers to.
    ///
    /// Among orders with the same side, product and volume the most
    /// competitive price is taken, since the market fills it first.
    ///
    /// # Errors
    ///
    /// Returns `UnmatchedFill` when no tracked order fits.
    pub fn remove_filled(&mut self, event: FillEvent) -> Result<TrackedOrder, UnmatchedFill> {
        let side = event.side;
        let candidate = self
            .tracked
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                o.side == event.side
                    && o.volume == event.volume
                    && o.product_name == event.product_name
            })
            .reduce(|best, next| {
                if side.outranks(next.1.price_per_unit, best.1.price_per_unit) {
                    next
                } else {
                    best
                }
            })
            .map(|(idx, _)| idx);

        let Some(idx) = candidate else {
            info!(
                product = %event.product_name,
                side = %event.side,
                volume = event.volume,
                "Fill matched no tracked order"
            );
            observability::record_unmatched_fill();
            return Err(UnmatchedFill { event });
        };

        let order = self.tracked.remove(idx);
        debug!(order = %order, "Filled order removed");

        observability::record_order_removed(RemovalReason::Filled);
        observability::update_tracked_orders(self.tracked.len());
        self.emit(&TrackerEvent::OrderRemoved(OrderRemoved {
            order: order.clone(),
            reason: RemovalReason::Filled,
            occurred_at: self.clock.now(),
        }));
        Ok(order)
    }

    /// Clear all tracked and outstanding state.
    pub fn reset(&mut self) {
        let cleared = std::mem::take(&mut self.tracked);
        let staged = self.outstanding.len();
        self.outstanding.clear();
        info!(tracked = cleared.len(), staged, "Tracker reset");

        let now = self.clock.now();
        for order in cleared {
            observability::record_order_removed(RemovalReason::Reset);
            self.emit(&TrackerEvent::OrderRemoved(OrderRemoved {
                order,
                reason: RemovalReason::Reset,
                occurred_at: now,
            }));
        }
        observability::update_tracked_orders(0);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Check a proposal against the last applied snapshot.
    ///
    /// Has no side effects and may be called repeatedly.
    #[must_use]
    pub fn validate_proposal(&self, proposal: &OrderProposal) -> ValidationResult {
        match &self.snapshot {
            Some(snapshot) => self.validator.validate(proposal, &self.catalog, snapshot),
            None => ValidationResult::allowed(),
        }
    }

    /// Final gate before submission, honouring the caller's override.
    #[must_use]
    pub fn check_submission(
        &self,
        proposal: &OrderProposal,
        override_active: bool,
    ) -> SubmissionDecision {
        let decision = decide_submission(self.validate_proposal(proposal), override_active);
        match &decision {
            SubmissionDecision::Block { reason } => {
                info!(
                    product = %proposal.product_name,
                    side = %proposal.side,
                    reason = reason.as_deref().unwrap_or_default(),
                    "Order submission blocked"
                );
                observability::record_protection_block(proposal.side);
            }
            SubmissionDecision::Overridden { .. } => {
                info!(product = %proposal.product_name, "Order protection overridden");
            }
            SubmissionDecision::Allow => {}
        }
        decision
    }

    /// Competition strictly ahead of `price` in `snapshot`.
    #[must_use]
    pub fn queue_position(
        &self,
        product_name: &str,
        side: OrderSide,
        price: f64,
        snapshot: &MarketSnapshot,
    ) -> Option<QueuePosition> {
        let product_id = self.catalog.name_to_id(product_name)?;
        let quote = snapshot.product(product_id)?;
        QueuePosition::compute(side, price, quote.competing_levels(side))
    }

    /// Orders currently tracked, in tracking order.
    #[must_use]
    pub fn tracked_orders(&self) -> &[TrackedOrder] {
        &self.tracked
    }

    /// Staged placements, including any not yet evicted.
    #[must_use]
    pub fn outstanding_len(&self) -> usize {
        self.outstanding.len()
    }

    /// Last applied snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&MarketSnapshot> {
        self.snapshot.as_ref()
    }

    /// Current catalog.
    #[must_use]
    pub const fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }
}

impl std::fmt::Debug for OrderTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderTracker")
            .field("tracked", &self.tracked)
            .field("outstanding", &self.outstanding)
            .field("policy", &self.policy)
            .field("validator", &self.validator)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::RecordingListener;
    use crate::domain::market::{PriceLevel, ProductQuote};
    use crate::domain::order_tracking::OrderStatus;
    use crate::domain::shared::ManualClock;

    fn catalog() -> ProductCatalog {
        [("ENCHANTED_DIAMOND", "Enchanted Diamond")]
            .into_iter()
            .collect()
    }

    fn tracker() -> (OrderTracker, ManualClock, RecordingListener) {
        let clock = ManualClock::at_millis(0);
        let mut tracker =
            OrderTracker::new(&TrackerConfig::default(), catalog(), Arc::new(clock.clone()))
                .unwrap();
        let recorder = RecordingListener::new();
        tracker.add_listener(recorder.clone());
        (tracker, clock, recorder)
    }

    fn panel(price: f64, slot: u32) -> PanelOrderInfo {
        PanelOrderInfo {
            product_name: "Enchanted Diamond".to_string(),
            side: OrderSide::Buy,
            volume: 64,
            price_per_unit: price,
            filled: false,
            panel_slot: Some(slot),
            filled_amount: 0,
            unclaimed: 0,
        }
    }

    fn snapshot(best_sell: f64, order_count: u32) -> MarketSnapshot {
        MarketSnapshot::new().with_product(
            "ENCHANTED_DIAMOND",
            ProductQuote {
                buy_summary: vec![PriceLevel::new(90.0, 64, 1)],
                sell_summary: vec![PriceLevel::new(best_sell, 64, order_count)],
            },
        )
    }

    fn staged(total: f64) -> OutstandingOrder {
        OutstandingOrder::new("Enchanted Diamond", OrderSide::Buy, 64, 100.0, total)
    }

    fn confirmation(name: &str, total: f64) -> ConfirmationEvent {
        ConfirmationEvent {
            product_name: name.to_string(),
            side: OrderSide::Buy,
            volume: 64,
            total,
        }
    }

    #[test]
    fn rejects_non_positive_window() {
        let mut config = TrackerConfig::default();
        config.outstanding.window_ms = -1;
        let err = OrderTracker::new(&config, catalog(), Arc::new(ManualClock::default()))
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_nan_threshold() {
        let mut config = TrackerConfig::default();
        config.protection.max_buy_undercut_pct = f64::NAN;
        assert!(OrderTracker::new(&config, catalog(), Arc::new(ManualClock::default())).is_err());
    }

    #[test]
    fn sync_panel_announces_removals_then_additions() {
        let (mut tracker, _, recorder) = tracker();
        tracker.sync_panel(vec![panel(100.0, 10)]);
        recorder.take();

        tracker.sync_panel(vec![panel(101.0, 10)]);

        let types: Vec<_> = recorder.events().iter().map(TrackerEvent::event_type).collect();
        assert_eq!(types, ["ORDER_REMOVED", "ORDER_ADDED"]);
        assert_eq!(tracker.tracked_orders().len(), 1);
        assert_eq!(tracker.tracked_orders()[0].price_per_unit, 101.0);
    }

    #[test]
    fn snapshot_application_is_idempotent() {
        let (mut tracker, _, recorder) = tracker();
        tracker.sync_panel(vec![panel(100.0, 10)]);
        recorder.take();

        tracker.apply_snapshot(snapshot(105.0, 1));
        assert_eq!(recorder.count("STATUS_CHANGED"), 1);

        tracker.apply_snapshot(snapshot(105.0, 1));
        assert_eq!(recorder.count("STATUS_CHANGED"), 1);
        assert_eq!(
            tracker.tracked_orders()[0].status,
            OrderStatus::Undercut { amount: 5.0 }
        );
    }

    #[test]
    fn first_top_is_silent_but_regain_alerts() {
        let (mut tracker, _, recorder) = tracker();
        tracker.sync_panel(vec![panel(100.0, 10)]);

        tracker.apply_snapshot(snapshot(100.0, 1));
        assert_eq!(recorder.count("STATUS_CHANGED"), 1);
        assert_eq!(recorder.count("ALERT"), 0);

        tracker.apply_snapshot(snapshot(105.0, 1));
        tracker.apply_snapshot(snapshot(100.0, 1));

        let alerts: Vec<_> = recorder
            .events()
            .into_iter()
            .filter_map(|e| match e {
                TrackerEvent::Alert(alert) => Some(alert.message),
                _ => None,
            })
            .collect();
        assert_eq!(
            alerts,
            [
                "Your Buy order for 64x Enchanted Diamond has been UNDERCUT by 5.0 coins!",
                "Your Buy order for 64x Enchanted Diamond has REGAINED BEST Order!",
            ]
        );
    }

    #[test]
    fn unresolved_product_keeps_status() {
        let (mut tracker, _, recorder) = tracker();
        tracker.sync_panel(vec![panel(100.0, 10)]);
        tracker.apply_snapshot(snapshot(100.0, 2));
        assert_eq!(tracker.tracked_orders()[0].status, OrderStatus::Matched);
        recorder.take();

        tracker.apply_snapshot(MarketSnapshot::new());

        assert!(recorder.events().is_empty());
        assert_eq!(tracker.tracked_orders()[0].status, OrderStatus::Matched);
    }

    #[test]
    fn confirmation_promotes_staged_order() {
        let (mut tracker, clock, recorder) = tracker();
        tracker.stage_outstanding(staged(6_400.0));
        clock.advance_millis(14_999);

        let id = tracker
            .confirm_outstanding(confirmation("enchanted diamond", 6_400.0))
            .unwrap();

        assert_eq!(tracker.tracked_orders()[0].id, id);
        assert_eq!(tracker.tracked_orders()[0].status, OrderStatus::Unknown);
        assert_eq!(tracker.tracked_orders()[0].panel_slot, None);
        assert_eq!(tracker.outstanding_len(), 0);
        assert_eq!(recorder.count("ORDER_ADDED"), 1);
    }

    #[test]
    fn expired_staged_order_is_not_promoted() {
        let (mut tracker, clock, _) = tracker();
        tracker.stage_outstanding(staged(6_400.0));
        clock.advance_millis(15_001);

        let err = tracker
            .confirm_outstanding(confirmation("Enchanted Diamond", 6_400.0))
            .unwrap_err();

        assert_eq!(err.event.total, 6_400.0);
        assert!(tracker.tracked_orders().is_empty());
        assert_eq!(tracker.outstanding_len(), 0);
    }

    #[test]
    fn unconfirmed_placements_do_not_accumulate() {
        let (mut tracker, clock, _) = tracker();
        for _ in 0..50 {
            tracker.stage_outstanding(staged(6_400.0));
            clock.advance_millis(20_000);
        }

        assert_eq!(tracker.outstanding_len(), 1);
    }

    #[test]
    fn confirmation_total_must_match_exactly() {
        let (mut tracker, _, _) = tracker();
        tracker.stage_outstanding(staged(6_400.0));

        assert!(tracker
            .confirm_outstanding(confirmation("Enchanted Diamond", 6_400.1))
            .is_err());
        assert_eq!(tracker.outstanding_len(), 1);
    }

    #[test]
    fn fill_removes_most_competitive_buy() {
        let (mut tracker, _, recorder) = tracker();
        tracker.sync_panel(vec![panel(100.0, 10), panel(102.0, 11), panel(101.0, 12)]);
        recorder.take();

        let removed = tracker
            .remove_filled(FillEvent {
                product_name: "Enchanted Diamond".to_string(),
                side: OrderSide::Buy,
                volume: 64,
            })
            .unwrap();

        assert_eq!(removed.price_per_unit, 102.0);
        assert_eq!(tracker.tracked_orders().len(), 2);
        match &recorder.events()[..] {
            [TrackerEvent::OrderRemoved(e)] => assert_eq!(e.reason, RemovalReason::Filled),
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn unmatched_fill_is_reported() {
        let (mut tracker, _, _) = tracker();
        let err = tracker
            .remove_filled(FillEvent {
                product_name: "Enchanted Diamond".to_string(),
                side: OrderSide::Sell,
                volume: 1,
            })
            .unwrap_err();
        assert_eq!(err.event.volume, 1);
    }

    #[test]
    fn reset_clears_everything() {
        let (mut tracker, _, recorder) = tracker();
        tracker.sync_panel(vec![panel(100.0, 10), panel(101.0, 11)]);
        tracker.stage_outstanding(staged(1.0));
        recorder.take();

        tracker.reset();

        assert!(tracker.tracked_orders().is_empty());
        assert_eq!(tracker.outstanding_len(), 0);
        assert_eq!(recorder.count("ORDER_REMOVED"), 2);
    }

    #[test]
    fn validation_uses_last_snapshot() {
        let (mut tracker, _, _) = tracker();
        let proposal = OrderProposal::new("Enchanted Diamond", OrderSide::Buy, 64, 120.0, 7_680.0);

        assert!(!tracker.validate_proposal(&proposal).blocked);

        tracker.apply_snapshot(snapshot(110.0, 1));
        assert!(tracker.validate_proposal(&proposal).blocked);
        assert!(!tracker.check_submission(&proposal, false).may_submit());
        assert!(tracker.check_submission(&proposal, true).may_submit());
    }

    #[test]
    fn queue_position_uses_competing_summary() {
        let (tracker, _, _) = tracker();
        let snap = MarketSnapshot::new().with_product(
            "ENCHANTED_DIAMOND",
            ProductQuote {
                buy_summary: Vec::new(),
                sell_summary: vec![PriceLevel::new(100.0, 10, 2), PriceLevel::new(105.0, 5, 1)],
            },
        );

        let pos = tracker
            .queue_position("Enchanted Diamond", OrderSide::Buy, 99.0, &snap)
            .unwrap();
        assert_eq!(pos.orders_ahead, 3);
        assert_eq!(pos.items_ahead, 15);
        assert!(tracker
            .queue_position("Unknown Item", OrderSide::Buy, 99.0, &snap)
            .is_none());
    }

    #[test]
    fn filtered_listeners_see_their_kind_only() {
        use std::sync::Mutex;

        let (mut tracker, _, _) = tracker();
        let added = Arc::new(Mutex::new(0));
        let changed = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&added);
        tracker.on_order_added(move |_| *counter.lock().unwrap() += 1);
        let counter = Arc::clone(&changed);
        tracker.on_status_changed(move |_| *counter.lock().unwrap() += 1);

        tracker.sync_panel(vec![panel(100.0, 10)]);
        tracker.apply_snapshot(snapshot(100.0, 1));

        assert_eq!(*added.lock().unwrap(), 1);
        assert_eq!(*changed.lock().unwrap(), 1);
    }
}
