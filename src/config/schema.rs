//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the metadata relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Process identity and routing defaults used by the metadata codec.
    pub metadata: MetadataConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Process-wide values consumed by the metadata codec.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MetadataConfig {
    /// Identity written as the caller on outgoing requests.
    pub app_id: String,

    /// Color assumed when an incoming request carries none.
    pub default_color: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Emit ANSI colors in log output.
    pub ansi: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "meta_relay=info,tower_http=info".to_string(),
            ansi: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [metadata]
            app_id = "main.web.gateway"
            "#,
        )
        .unwrap();

        assert_eq!(config.metadata.app_id, "main.web.gateway");
        assert_eq!(config.metadata.default_color, "");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_full_config() {
        let config: RelayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [metadata]
            app_id = "main.account.service"
            default_color = "red"

            [timeouts]
            request_secs = 5

            [observability]
            log_level = "debug"
            ansi = false
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.metadata.default_color, "red");
        assert_eq!(config.timeouts.request_secs, 5);
        assert!(!config.observability.ansi);
    }
}
