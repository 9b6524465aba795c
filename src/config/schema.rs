//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transport type accepted by the resolver.
pub const TCP: &str = "tcp";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener configuration.
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Legacy transport limits.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Defaults for the HTTP front.
    pub gateway: FrontConfig,

    /// Route key (`"<METHOD> <path>"`) to protocol metadata.
    pub routes: HashMap<String, RouteConfig>,

    /// Destination name to backend address and port lists.
    pub destinations: HashMap<String, DestinationConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

/// Protocol metadata for one route key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// System code (envelope width 10).
    pub system: String,

    /// Service code (envelope width 15).
    pub service: String,

    /// Format code (envelope width 3).
    pub format: String,

    /// Declared body length, five digits (e.g. "00123").
    pub request_length: String,
}

/// A legacy backend host and its per-operation port candidates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DestinationConfig {
    /// Transport type; only "tcp" is served.
    #[serde(rename = "type")]
    pub kind: String,

    /// Backend host IP.
    pub ip: String,

    /// Operation name to candidate ports, in configured order.
    #[serde(default)]
    pub ports: HashMap<String, Vec<String>>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// TCP connect timeout in milliseconds.
    pub dial_ms: u64,

    /// Write and read-one-line timeout in milliseconds.
    pub read_write_ms: u64,

    /// Whole inbound HTTP request timeout in seconds.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn dial(&self) -> Duration {
        Duration::from_millis(self.dial_ms)
    }

    pub fn read_write(&self) -> Duration {
        Duration::from_millis(self.read_write_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            dial_ms: 3_000,
            read_write_ms: 30_000,
            request_secs: 60,
        }
    }
}

/// Legacy transport limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Longest reply line accepted, in bytes, LF included.
    pub max_reply_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_reply_bytes: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Defaults used by the HTTP front.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontConfig {
    /// Destination every endpoint sends to.
    pub destination: String,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            destination: "crs".to_string(),
        }
    }
}
