//! Order tracking aggregate.

mod tracked_order;

pub use tracked_order::TrackedOrder;
