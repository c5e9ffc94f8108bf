//! # Controller Configuration
//!
//! Operator-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_BACKOFF_MAX_MINUTES, DEFAULT_BACKOFF_MIN_MINUTES, DEFAULT_CONTROLLER_NAMESPACE,
    DEFAULT_METRICS_PORT, DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
    DEFAULT_SERVER_POLL_INTERVAL_MS, DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
    DEFAULT_UPTIMEROBOT_API_URL,
};
use std::time::Duration;
use thiserror::Error;
use zeroize::Zeroizing;

/// Environment variable holding the UptimeRobot API key
pub const API_KEY_ENV: &str = "UPTIMEROBOT_API_KEY";

/// Environment variable switching off all Ingress handling
pub const DISABLE_INGRESS_HANDLING_ENV: &str = "URO_DISABLE_INGRESS_HANDLING";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} has not been provided")]
    MissingVariable(&'static str),
}

/// Operator-level configuration
///
/// Everything except the API key has a default. The values are read once at
/// startup and shared read-only with every handler afterwards.
#[derive(Clone)]
pub struct ControllerConfig {
    /// UptimeRobot API key, wiped from memory on drop
    pub api_key: Zeroizing<String>,
    /// UptimeRobot API base URL
    pub api_url: String,
    /// When true, Ingress create/update events are ignored
    pub disable_ingress_handling: bool,
    /// Port of the metrics and probe server
    pub metrics_port: u16,
    /// Requeue interval used when the backoff state cannot be read (seconds)
    pub reconciliation_error_requeue_secs: u64,
    /// Fibonacci backoff floor for transient errors (minutes)
    pub backoff_min_minutes: u64,
    /// Fibonacci backoff ceiling for transient errors (minutes)
    pub backoff_max_minutes: u64,
    /// Namespace the operator runs in
    pub controller_namespace: String,
    /// How long to wait for the probe server to bind (seconds)
    pub server_startup_timeout_secs: u64,
    /// Poll interval while waiting for the probe server (milliseconds)
    pub server_poll_interval_ms: u64,
}

impl std::fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("api_key", &"***")
            .field("api_url", &self.api_url)
            .field("disable_ingress_handling", &self.disable_ingress_handling)
            .field("metrics_port", &self.metrics_port)
            .field("controller_namespace", &self.controller_namespace)
            .finish_non_exhaustive()
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    ///
    /// # Errors
    ///
    /// Fails when `UPTIMEROBOT_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVariable(API_KEY_ENV))?;

        Ok(Self::with_api_key(api_key))
    }

    /// Build a configuration around an explicit API key, reading the rest from the environment
    #[must_use]
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            api_key: Zeroizing::new(api_key),
            api_url: env_var_or_default_str("UPTIMEROBOT_API_URL", DEFAULT_UPTIMEROBOT_API_URL),
            disable_ingress_handling: env_var_or_default_bool(DISABLE_INGRESS_HANDLING_ENV, false),
            metrics_port: env_var_or_default("METRICS_PORT", DEFAULT_METRICS_PORT),
            reconciliation_error_requeue_secs: env_var_or_default(
                "RECONCILIATION_ERROR_REQUEUE_SECS",
                DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            ),
            backoff_min_minutes: env_var_or_default(
                "BACKOFF_MIN_MINUTES",
                DEFAULT_BACKOFF_MIN_MINUTES,
            ),
            backoff_max_minutes: env_var_or_default(
                "BACKOFF_MAX_MINUTES",
                DEFAULT_BACKOFF_MAX_MINUTES,
            ),
            controller_namespace: env_var_or_default_str(
                "POD_NAMESPACE",
                DEFAULT_CONTROLLER_NAMESPACE,
            ),
            server_startup_timeout_secs: env_var_or_default(
                "SERVER_STARTUP_TIMEOUT_SECS",
                DEFAULT_SERVER_STARTUP_TIMEOUT_SECS,
            ),
            server_poll_interval_ms: env_var_or_default(
                "SERVER_POLL_INTERVAL_MS",
                DEFAULT_SERVER_POLL_INTERVAL_MS,
            ),
        }
    }

    /// Get reconciliation error requeue duration
    #[must_use]
    pub fn reconciliation_error_requeue_duration(&self) -> Duration {
        Duration::from_secs(self.reconciliation_error_requeue_secs)
    }

    /// Get probe server startup timeout
    #[must_use]
    pub fn server_startup_timeout(&self) -> Duration {
        Duration::from_secs(self.server_startup_timeout_secs)
    }

    /// Get probe server poll interval
    #[must_use]
    pub fn server_poll_interval(&self) -> Duration {
        Duration::from_millis(self.server_poll_interval_ms)
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as boolean or return default
fn env_var_or_default_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map_or(default, |v| parse_bool_flag(&v))
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Interpret a feature flag value; anything but a truthy word is false
pub(crate) fn parse_bool_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_flag_truthy_values() {
        for value in ["true", "True", "1", "yes", "ON", " true "] {
            assert!(parse_bool_flag(value), "{value} should enable the flag");
        }
    }

    #[test]
    fn test_parse_bool_flag_falsy_values() {
        for value in ["false", "0", "", "no", "off", "disabled"] {
            assert!(!parse_bool_flag(value), "{value} should not enable the flag");
        }
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ControllerConfig::with_api_key("u123-secret".to_string());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("u123-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_durations_follow_fields() {
        let mut config = ControllerConfig::with_api_key("key".to_string());
        config.reconciliation_error_requeue_secs = 42;
        config.server_poll_interval_ms = 25;
        assert_eq!(
            config.reconciliation_error_requeue_duration(),
            Duration::from_secs(42)
        );
        assert_eq!(config.server_poll_interval(), Duration::from_millis(25));
    }
}
