//! Application layer.
//!
//! Wires the domain services into the [`OrderTracker`] façade and runs it
//! behind a single-writer [`TrackerDriver`].

mod driver;
pub mod ports;
mod tracker;

pub use driver::{TrackerCommand, TrackerDriver, TrackerHandle};
pub use ports::{RecordingListener, TrackerListener};
pub use tracker::OrderTracker;
