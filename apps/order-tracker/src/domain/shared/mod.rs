//! Shared kernel: value objects used across the domain.

mod catalog;
mod clock;
mod format;
mod timestamp;

pub use catalog::ProductCatalog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use format::format_decimal;
pub use timestamp::Timestamp;
