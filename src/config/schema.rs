//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the boundary
//! layer and its demo server. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request body limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Static directories mounted under URL prefixes.
    pub static_mounts: Vec<StaticMountConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
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

/// Request body limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes. `None` disables the ceiling.
    pub max_request_body_bytes: Option<usize>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_body_bytes: Some(2 * 1024 * 1024), // 2MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

/// A static directory mount.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticMountConfig {
    /// Directory to serve. `~/` is expanded.
    pub directory: String,

    /// URL prefix, e.g. "/static".
    #[serde(default = "default_url_path")]
    pub url_path: String,

    /// `Cache-Control` max-age in seconds. Signed so that negative values
    /// reach validation instead of failing deserialization.
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age: i64,
}

fn default_url_path() -> String {
    "/static".to_string()
}

fn default_cache_max_age() -> i64 {
    3600
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
