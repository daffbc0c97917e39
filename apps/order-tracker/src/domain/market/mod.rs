//! Market data consumed by the tracker.

mod queue;
mod snapshot;

pub use queue::QueuePosition;
pub use snapshot::{MarketSnapshot, PriceLevel, ProductQuote};
