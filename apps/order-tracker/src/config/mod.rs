//! Configuration module for the order tracker.
//!
//! Loads YAML with environment variable interpolation and validates the
//! few preconditions the tracker cannot run without.
//!
//! # Usage
//!
//! ```rust,ignore
//! use order_tracker::config::load_config;
//!
//! let config = load_config("tracker.yaml")?;
//! println!("window: {}ms", config.outstanding.window_ms);
//! ```

mod notifications;
mod observability;
mod outstanding;
mod protection;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use notifications::NotificationsConfig;
pub use observability::{LoggingConfig, MetricsConfig, ObservabilityConfig};
pub use outstanding::OutstandingConfig;
pub use protection::ProtectionConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),
    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Status change alerts.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Pre-submission protection.
    #[serde(default)]
    pub protection: ProtectionConfig,
    /// Outstanding order staging.
    #[serde(default)]
    pub outstanding: OutstandingConfig,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: impl AsRef<Path>) -> Result<TrackerConfig, ConfigError> {
    let path = path.as_ref();

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<TrackerConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: TrackerConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` naming the first offending field.
pub fn validate_config(config: &TrackerConfig) -> Result<(), ConfigError> {
    if config.outstanding.window_ms <= 0 {
        return Err(ConfigError::ValidationError(
            "outstanding.window_ms must be positive".to_string(),
        ));
    }

    let thresholds = [
        (
            "protection.max_buy_undercut_pct",
            config.protection.max_buy_undercut_pct,
        ),
        (
            "protection.max_sell_undercut_pct",
            config.protection.max_sell_undercut_pct,
        ),
    ];
    for (name, value) in thresholds {
        if !(0.0..=100.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be between 0 and 100, got {value}"
            )));
        }
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    if config.observability.metrics.enabled
        && config
            .observability
            .metrics
            .listen_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        return Err(ConfigError::ValidationError(format!(
            "observability.metrics.listen_addr is not a socket address: {}",
            config.observability.metrics.listen_addr
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_tracking::GotoAction;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();

        assert!(config.notifications.enabled);
        assert!(config.notifications.notify_top_only_on_regain);
        assert_eq!(config.notifications.goto_on_undercut, GotoAction::Orders);
        assert!(config.protection.block_undercut_of_opposing);
        assert!((config.protection.max_sell_undercut_pct - 15.0).abs() < f64::EPSILON);
        assert_eq!(config.outstanding.window_ms, 15_000);
        assert_eq!(config.observability.logging.format, "pretty");
        assert!(!config.observability.metrics.enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config.outstanding.window_ms, 15_000);
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
notifications:
  enabled: true
  notify_top: false
  notify_top_only_on_regain: false
  goto_on_matched: item
  goto_on_undercut: none

protection:
  block_undercut_percentage: false
  max_buy_undercut_pct: 20
  max_sell_undercut_pct: 7.5

outstanding:
  window_ms: 30000

observability:
  logging:
    level: "debug"
    format: "json"
  metrics:
    enabled: true
    listen_addr: "0.0.0.0:9100"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert!(!config.notifications.notify_top);
        assert!(config.notifications.notify_matched);
        assert_eq!(config.notifications.goto_on_matched, GotoAction::Item);
        assert_eq!(config.notifications.goto_on_undercut, GotoAction::None);
        assert!(!config.protection.block_undercut_percentage);
        assert!((config.protection.max_buy_undercut_pct - 20.0).abs() < f64::EPSILON);
        assert!((config.protection.max_sell_undercut_pct - 7.5).abs() < f64::EPSILON);
        assert_eq!(config.outstanding.window_ms, 30_000);
        assert_eq!(config.observability.logging.level, "debug");
        assert!(config.observability.metrics.enabled);

        let policy = config.notifications.to_policy();
        assert!(!policy.notify_top);
        let validator = config.protection.to_validator();
        assert!(!validator.block_undercut_percentage);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "window_ms: ${ORDER_TRACKER_TEST_NONEXISTENT_VAR:-15000}";
        assert_eq!(interpolate_env_vars(input), "window_ms: 15000");
    }

    #[test]
    fn test_env_var_without_default_when_missing() {
        let input = "level: \"${ORDER_TRACKER_TEST_NONEXISTENT_VAR}\"";
        assert_eq!(interpolate_env_vars(input), "level: \"\"");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "path: default");
        assert!(!result.contains("${"));
    }

    #[test]
    fn test_rejects_non_positive_window() {
        let Err(err) = load_config_from_string("outstanding:\n  window_ms: 0\n") else {
            panic!("expected error for zero window");
        };
        assert!(err.to_string().contains("window_ms"));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let Err(err) = load_config_from_string("protection:\n  max_sell_undercut_pct: 150\n")
        else {
            panic!("expected error for threshold above 100");
        };
        assert!(err.to_string().contains("max_sell_undercut_pct"));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let yaml = "observability:\n  logging:\n    format: xml\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid format");
        };
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_rejects_bad_metrics_addr_only_when_enabled() {
        let yaml = "observability:\n  metrics:\n    listen_addr: nowhere\n";
        assert!(load_config_from_string(yaml).is_ok());

        let yaml = "observability:\n  metrics:\n    enabled: true\n    listen_addr: nowhere\n";
        assert!(load_config_from_string(yaml).is_err());
    }
}
