//! Staging window for placed-but-unconfirmed orders.

use serde::{Deserialize, Serialize};

/// Outstanding order store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingConfig {
    /// How long a staged placement waits for its confirmation, in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
}

impl Default for OutstandingConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
        }
    }
}

const fn default_window_ms() -> i64 {
    15_000
}
