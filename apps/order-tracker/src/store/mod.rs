//! Short-lived staging storage.

mod timed_store;

pub use timed_store::{TimedStore, Timestamped};
