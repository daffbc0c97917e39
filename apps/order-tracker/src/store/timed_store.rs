//! Bounded-lifetime staging collection.
//!
//! Entries older than the configured window are evicted lazily on every
//! insert and scan; there is no background timer.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::shared::{Clock, Timestamp};
use crate::error::TrackerError;

/// An entry that carries its own creation stamp.
pub trait Timestamped {
    /// When the entry was staged.
    fn created_at(&self) -> Timestamp;

    /// Overwrite the creation stamp (done by the store on insert).
    fn set_created_at(&mut self, at: Timestamp);
}

/// Insertion-ordered store whose entries expire after `window_ms`.
pub struct TimedStore<T> {
    entries: Vec<T>,
    window_ms: i64,
    clock: Arc<dyn Clock>,
}

impl<T: Timestamped> TimedStore<T> {
    /// Create a store with the given expiry window.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidConfig` if the window is not positive.
    pub fn new(window_ms: i64, clock: Arc<dyn Clock>) -> Result<Self, TrackerError> {
        if window_ms <= 0 {
            return Err(TrackerError::InvalidConfig(format!(
                "timed store window must be positive, got {window_ms}ms"
            )));
        }

        Ok(Self {
            entries: Vec::new(),
            window_ms,
            clock,
        })
    }

    /// Evict expired entries, then append one stamped with the current time.
    pub fn add(&mut self, mut entry: T) {
        self.evict_expired();
        entry.set_created_at(self.clock.now());
        self.entries.push(entry);
        trace!(pending = self.entries.len(), "Entry staged");
    }

    /// Evict expired entries, then remove and return the first remaining
    /// entry satisfying `predicate`.
    ///
    /// Expiry is applied before matching, so an expired entry never matches.
    pub fn remove_first_match<P>(&mut self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.evict_expired();
        let idx = self.entries.iter().position(predicate)?;
        Some(self.entries.remove(idx))
    }

    /// Drop every entry older than the window. Returns how many were dropped.
    pub fn evict_expired(&mut self) -> usize {
        let now = self.clock.now();
        let window_ms = self.window_ms;
        let before = self.entries.len();

        self.entries
            .retain(|entry| now.millis_since(entry.created_at()) <= window_ms);

        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, window_ms, "Evicted expired staged entries");
        }
        evicted
    }

    /// Number of entries held as of the last insert or scan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Configured expiry window in milliseconds.
    #[must_use]
    pub const fn window_ms(&self) -> i64 {
        self.window_ms
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TimedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedStore")
            .field("entries", &self.entries)
            .field("window_ms", &self.window_ms)
            .finish_non_exhaustive()
    }
}
