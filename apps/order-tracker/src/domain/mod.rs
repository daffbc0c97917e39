//! Domain layer.
//!
//! Pure logic with no I/O. Everything here is driven by the application
//! layer and can be exercised directly in tests.

pub mod market;
pub mod order_protection;
pub mod order_tracking;
pub mod shared;
