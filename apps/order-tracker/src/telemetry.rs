//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level.
//!
//! # Usage
//!
//! ```rust,ignore
//! use order_tracker::{config::LoggingConfig, telemetry::init_tracing};
//!
//! init_tracing(&LoggingConfig::default())?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Error returned when a global subscriber is already installed.
#[derive(Debug, thiserror::Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(String);

/// Install the global fmt subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber was already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    result.map_err(|e| TelemetryError(e.to_string()))
}
