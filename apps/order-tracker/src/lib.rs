// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Order Tracker - Rust Core Library
//!
//! Keeps one record per live order in a continuous double-auction market,
//! tagged with a market-relative status, by reconciling three unreliable
//! inputs: full market snapshots, order panel scrapes, and short
//! confirmation messages.
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure logic
//!   - `order_tracking`: tracked order entity, status state machine,
//!     reconciliation, status evaluation, notification policy
//!   - `order_protection`: pre-submission price checks
//!   - `market`: snapshot model and queue position
//!   - `shared`: timestamps, injected clock, product catalog
//!
//! - **Store**: lazily evicting staging store for placed orders
//!
//! - **Application**: `OrderTracker` façade, listener port, single-writer driver
//!
//! - **Config / Observability / Telemetry**: YAML config, metrics, tracing setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Layers
// =============================================================================

/// Domain layer - Core business logic with no I/O.
pub mod domain;

/// Time-bounded staging storage.
pub mod store;

/// Application layer - Tracker façade, ports, and driver.
pub mod application;

/// Configuration loading and validation.
pub mod config;

/// Metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

/// Error types.
pub mod error;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::{
    OrderTracker, RecordingListener, TrackerDriver, TrackerHandle, TrackerListener,
};
pub use config::{TrackerConfig, load_config, load_config_from_string};
pub use domain::market::{MarketSnapshot, PriceLevel, ProductQuote, QueuePosition};
pub use domain::order_protection::{
    OrderProposal, OrderProtectionValidator, SubmissionDecision, ValidationResult,
};
pub use domain::order_tracking::{
    ConfirmationEvent, FillEvent, OrderSide, OrderStatus, OutstandingOrder, PanelOrderInfo,
    SyncResult, TrackedOrder, TrackedOrderId, TrackerEvent,
};
pub use domain::shared::{Clock, ManualClock, ProductCatalog, SystemClock, Timestamp};
pub use error::{ErrorCode, TrackerError, UnmatchedConfirmation, UnmatchedFill};
