//! Tracker Listener Port (Driven Port)
//!
//! Interface through which hosts observe the tracked-order set. Listeners
//! run synchronously on the tracker's single writer, in registration order.

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::order_tracking::events::TrackerEvent;

/// Port for observing tracker events.
pub trait TrackerListener: Send {
    /// Handle one event.
    fn on_event(&mut self, event: &TrackerEvent);
}

impl<F> TrackerListener for F
where
    F: FnMut(&TrackerEvent) + Send,
{
    fn on_event(&mut self, event: &TrackerEvent) {
        self(event);
    }
}

/// Listener that keeps every event it sees.
///
/// Clones share the same buffer, so one clone can be registered while
/// another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<TrackerEvent>>>,
}

impl RecordingListener {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<TrackerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain and return everything recorded so far.
    pub fn take(&self) -> Vec<TrackerEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of recorded events with the given type name.
    #[must_use]
    pub fn count(&self, event_type: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }
}

impl TrackerListener for RecordingListener {
    fn on_event(&mut self, event: &TrackerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_tracking::events::{OrderRemoved, RemovalReason};
    use crate::domain::order_tracking::{OrderSide, TrackedOrder};
    use crate::domain::shared::Timestamp;

    fn removed() -> TrackerEvent {
        TrackerEvent::OrderRemoved(OrderRemoved {
            order: TrackedOrder::new("Foo", OrderSide::Buy, 1, 1.0, None),
            reason: RemovalReason::Reset,
            occurred_at: Timestamp::from_unix_millis(0),
        })
    }

    #[test]
    fn recording_clones_share_buffer() {
        let recorder = RecordingListener::new();
        let mut registered = recorder.clone();

        registered.on_event(&removed());

        assert_eq!(recorder.count("ORDER_REMOVED"), 1);
        assert_eq!(recorder.take().len(), 1);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn closures_are_listeners() {
        let mut seen = 0;
        {
            let mut listener = |_: &TrackerEvent| seen += 1;
            listener.on_event(&removed());
            listener.on_event(&removed());
        }
        assert_eq!(seen, 2);
    }
}
