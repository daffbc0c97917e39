//! Order tracking value objects.

mod identity;
mod order_side;
mod order_status;

pub use identity::{OrderIdentity, TrackedOrderId};
pub use order_side::OrderSide;
pub use order_status::OrderStatus;
