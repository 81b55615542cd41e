//! Core configuration.
//!
//! Defaults match production. Values can be overridden with builder methods
//! or from the environment.
//!
//! # Example
//!
//! ```ignore
//! use vpn_session_core::config::CoreConfig;
//!
//! let config = CoreConfig::default()
//!     .with_retry_backoff_floor(std::time::Duration::from_secs(5));
//! ```

use std::time::Duration;

use crate::certificate::DEFAULT_RETRY_FLOOR;
use crate::error::ConfigError;

/// Environment variable overriding the retry floor, in seconds.
pub const ENV_RETRY_BACKOFF_SECS: &str = "VPN_CORE_RETRY_BACKOFF_SECS";
/// Environment variable overriding the telemetry API base URL.
pub const ENV_TELEMETRY_URL: &str = "VPN_CORE_TELEMETRY_URL";
/// Environment variable overriding the measurement group.
pub const ENV_MEASUREMENT_GROUP: &str = "VPN_CORE_MEASUREMENT_GROUP";

/// Telemetry endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// API base URL
    pub base_url: String,
    /// Path of the stats endpoint
    pub stats_path: String,
    /// Measurement group sent with every event
    pub measurement_group: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://vpn-api.proton.me".to_string(),
            stats_path: "/data/v1/stats".to_string(),
            measurement_group: "vpn.any.connection".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl TelemetryConfig {
    /// Full URL of the stats endpoint.
    pub fn stats_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.stats_path.trim_start_matches('/')
        )
    }
}

/// Configuration for the certificate and telemetry core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Smallest retry interval after a failed certificate refresh (default: 10s)
    pub retry_backoff_floor: Duration,
    pub telemetry: TelemetryConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            retry_backoff_floor: DEFAULT_RETRY_FLOOR,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl CoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from defaults plus process environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from defaults plus overrides returned by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_RETRY_BACKOFF_SECS) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: ENV_RETRY_BACKOFF_SECS,
                    value: value.clone(),
                })?;
            config.retry_backoff_floor = Duration::from_secs(secs);
        }

        if let Some(url) = lookup(ENV_TELEMETRY_URL) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    name: ENV_TELEMETRY_URL,
                    value: url,
                });
            }
            config.telemetry.base_url = url;
        }

        if let Some(group) = lookup(ENV_MEASUREMENT_GROUP) {
            if group.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: ENV_MEASUREMENT_GROUP,
                    value: group,
                });
            }
            config.telemetry.measurement_group = group;
        }

        Ok(config)
    }

    /// Set the retry floor.
    pub fn with_retry_backoff_floor(mut self, floor: Duration) -> Self {
        self.retry_backoff_floor = floor;
        self
    }

    /// Set the telemetry API base URL.
    pub fn with_telemetry_url(mut self, base_url: impl Into<String>) -> Self {
        self.telemetry.base_url = base_url.into();
        self
    }

    /// Set the measurement group.
    pub fn with_measurement_group(mut self, group: impl Into<String>) -> Self {
        self.telemetry.measurement_group = group.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.retry_backoff_floor, Duration::from_secs(10));
        assert_eq!(
            config.telemetry.stats_url(),
            "https://vpn-api.proton.me/data/v1/stats"
        );
        assert_eq!(config.telemetry.measurement_group, "vpn.any.connection");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_RETRY_BACKOFF_SECS, "3"),
            (ENV_TELEMETRY_URL, "http://localhost:8080/"),
            (ENV_MEASUREMENT_GROUP, "vpn.linux.connection"),
        ]))
        .unwrap();

        assert_eq!(config.retry_backoff_floor, Duration::from_secs(3));
        assert_eq!(config.telemetry.stats_url(), "http://localhost:8080/data/v1/stats");
        assert_eq!(config.telemetry.measurement_group, "vpn.linux.connection");
    }

    #[test]
    fn test_invalid_backoff_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_RETRY_BACKOFF_SECS, "ten")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: ENV_RETRY_BACKOFF_SECS,
                value: "ten".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(CoreConfig::from_lookup(lookup(&[(ENV_TELEMETRY_URL, "ftp://x")])).is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = CoreConfig::new()
            .with_retry_backoff_floor(Duration::from_secs(1))
            .with_telemetry_url("http://127.0.0.1:1")
            .with_measurement_group("group");
        assert_eq!(config.retry_backoff_floor, Duration::from_secs(1));
        assert_eq!(config.telemetry.base_url, "http://127.0.0.1:1");
        assert_eq!(config.telemetry.measurement_group, "group");
    }
}
