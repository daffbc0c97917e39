//! Error types for the order tracker.
//!
//! The tracker treats almost every irregular input as a normal condition
//! (logged and skipped). What remains surfaces here:
//!
//! | Code | Raised by | Host reaction |
//! |------|-----------|---------------|
//! | `UNMATCHED_CONFIRMATION` | `confirm_outstanding` | Prompt a full resync |
//! | `UNMATCHED_FILL` | `remove_filled` | Prompt a full resync |
//! | `INVALID_CONFIG` | construction | Fix configuration |
//! | `DRIVER_CLOSED` | `TrackerHandle` | Restart the driver |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::order_tracking::{ConfirmationEvent, FillEvent};

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A confirmation message had no staged counterpart.
    UnmatchedConfirmation,
    /// A fill message had no tracked counterpart.
    UnmatchedFill,
    /// Configuration precondition violated.
    InvalidConfig,
    /// The single-writer driver task has stopped.
    DriverClosed,
}

impl ErrorCode {
    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UnmatchedConfirmation => "UNMATCHED_CONFIRMATION",
            Self::UnmatchedFill => "UNMATCHED_FILL",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::DriverClosed => "DRIVER_CLOSED",
        }
    }

    /// True when the host should resynchronize tracked orders from the panel.
    #[must_use]
    pub const fn requires_resync(&self) -> bool {
        matches!(self, Self::UnmatchedConfirmation | Self::UnmatchedFill)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A confirmation arrived with no matching staged order (never staged or expired).
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "No outstanding order matches {side} {volume}x {product_name} totalling {total}",
    side = .event.side,
    volume = .event.volume,
    product_name = .event.product_name,
    total = .event.total
)]
pub struct UnmatchedConfirmation {
    /// The dropped confirmation.
    pub event: ConfirmationEvent,
}

/// A fill message arrived with no tracked order to remove.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "No tracked order matches filled {side} {volume}x {product_name}",
    side = .event.side,
    volume = .event.volume,
    product_name = .event.product_name
)]
pub struct UnmatchedFill {
    /// The dropped fill notice.
    pub event: FillEvent,
}

/// Errors from the order tracker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// See [`UnmatchedConfirmation`].
    #[error(transparent)]
    UnmatchedConfirmation(#[from] UnmatchedConfirmation),

    /// See [`UnmatchedFill`].
    #[error(transparent)]
    UnmatchedFill(#[from] UnmatchedFill),

    /// Configuration precondition violated.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The driver task is no longer running.
    #[error("Tracker driver has shut down")]
    DriverClosed,
}

impl TrackerError {
    /// Error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnmatchedConfirmation(_) => ErrorCode::UnmatchedConfirmation,
            Self::UnmatchedFill(_) => ErrorCode::UnmatchedFill,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
            Self::DriverClosed => ErrorCode::DriverClosed,
        }
    }
}
