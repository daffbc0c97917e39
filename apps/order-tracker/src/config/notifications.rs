//! Alert switches for order status changes.

use serde::{Deserialize, Serialize};

use crate::domain::order_tracking::{GotoAction, NotificationPolicy};

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Master switch.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Alert on reaching the best price.
    #[serde(default = "default_true")]
    pub notify_top: bool,
    /// Skip the alert for an order's first classification.
    #[serde(default = "default_true")]
    pub notify_top_only_on_regain: bool,
    /// Alert when another order joins the best price.
    #[serde(default = "default_true")]
    pub notify_matched: bool,
    /// Alert when outbid.
    #[serde(default = "default_true")]
    pub notify_undercut: bool,
    /// Click action for matched alerts: `none`, `item`, or `orders`.
    #[serde(default)]
    pub goto_on_matched: GotoAction,
    /// Click action for undercut alerts.
    #[serde(default)]
    pub goto_on_undercut: GotoAction,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notify_top: true,
            notify_top_only_on_regain: true,
            notify_matched: true,
            notify_undercut: true,
            goto_on_matched: GotoAction::default(),
            goto_on_undercut: GotoAction::default(),
        }
    }
}

impl NotificationsConfig {
    /// Convert to the policy used by the tracker.
    #[must_use]
    pub const fn to_policy(&self) -> NotificationPolicy {
        NotificationPolicy {
            enabled: self.enabled,
            notify_top: self.notify_top,
            notify_top_only_on_regain: self.notify_top_only_on_regain,
            notify_matched: self.notify_matched,
            notify_undercut: self.notify_undercut,
            goto_on_matched: self.goto_on_matched,
            goto_on_undercut: self.goto_on_undercut,
        }
    }
}

pub(super) const fn default_true() -> bool {
    true
}
