//! Notification policy.
//!
//! Decides which status transitions are worth an alert and renders the
//! alert text.

use serde::{Deserialize, Serialize};

use crate::domain::order_tracking::aggregate::TrackedOrder;
use crate::domain::order_tracking::events::{GotoAction, OrderAlert};
use crate::domain::order_tracking::value_objects::OrderStatus;
use crate::domain::shared::{Timestamp, format_decimal};

/// Static switches governing alerts.
///
/// | new status | alert when |
/// |------------|------------|
/// | `Top` | `notify_top` and (`!notify_top_only_on_regain` or previous is not `Unknown`) |
/// | `Matched` | `notify_matched` |
/// | `Undercut` | `notify_undercut` |
/// | `Unknown` | never |
///
/// Every row is additionally gated by `enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    /// Master switch.
    pub enabled: bool,
    /// Alert on reaching `Top`.
    pub notify_top: bool,
    /// Suppress the first classification into `Top`.
    pub notify_top_only_on_regain: bool,
    /// Alert on `Matched`.
    pub notify_matched: bool,
    /// Alert on `Undercut`.
    pub notify_undercut: bool,
    /// Click action attached to `Matched` alerts.
    pub goto_on_matched: GotoAction,
    /// Click action attached to `Undercut` alerts.
    pub goto_on_undercut: GotoAction,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            notify_top: true,
            notify_top_only_on_regain: true,
            notify_matched: true,
            notify_undercut: true,
            goto_on_matched: GotoAction::Orders,
            goto_on_undercut: GotoAction::Orders,
        }
    }
}

impl NotificationPolicy {
    /// True if the `previous -> current` transition should alert.
    #[must_use]
    pub const fn should_notify(&self, previous: OrderStatus, current: OrderStatus) -> bool {
        if !self.enabled {
            return false;
        }

        match current {
            OrderStatus::Top => {
                self.notify_top && (!self.notify_top_only_on_regain || !previous.is_unknown())
            }
            OrderStatus::Matched => self.notify_matched,
            OrderStatus::Undercut { .. } => self.notify_undercut,
            OrderStatus::Unknown => false,
        }
    }

    /// Build the alert for a transition, or `None` if it should not alert.
    ///
    /// `order` must already carry the new status.
    #[must_use]
    pub fn alert(
        &self,
        order: &TrackedOrder,
        previous: OrderStatus,
        occurred_at: Timestamp,
    ) -> Option<OrderAlert> {
        let current = order.status;
        if !self.should_notify(previous, current) {
            return None;
        }

        let subject = format!(
            "Your {} for {}x {}",
            order.side.order_label(),
            order.volume,
            order.product_name
        );

        let (message, goto) = match current {
            OrderStatus::Top if previous.is_unknown() => {
                (format!("{subject} is the BEST Order!"), None)
            }
            OrderStatus::Top => (format!("{subject} has REGAINED BEST Order!"), None),
            OrderStatus::Matched => (
                format!("{subject} has been MATCHED!"),
                Self::goto(self.goto_on_matched),
            ),
            OrderStatus::Undercut { amount } => (
                format!(
                    "{subject} has been UNDERCUT by {} coins!",
                    format_decimal(amount, 1)
                ),
                Self::goto(self.goto_on_undercut),
            ),
            OrderStatus::Unknown => return None,
        };

        Some(OrderAlert {
            order_id: order.id,
            product_name: order.product_name.clone(),
            side: order.side,
            status: current,
            message,
            goto,
            occurred_at,
        })
    }

    const fn goto(action: GotoAction) -> Option<GotoAction> {
        match action {
            GotoAction::None => None,
            other => Some(other),
        }
    }
}
