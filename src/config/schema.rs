//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the forwarder.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge forwarder.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single fixed upstream origin.
    pub upstream: UpstreamConfig,

    /// Outbound header policy.
    pub headers: HeaderPolicyConfig,

    /// Request body forwarding policy.
    pub body: BodyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Static routes served by the edge itself.
    pub routes: RoutesConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

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

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the backend (scheme + host + optional port).
    pub base_url: String,

    /// Public path prefix under which the backend API is mounted.
    pub mount_prefix: String,

    /// Metadata document forwarded without prefix stripping.
    pub metadata_path: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8001".to_string(),
            mount_prefix: "/api".to_string(),
            metadata_path: "/openapi.json".to_string(),
        }
    }
}

/// How the outbound header set is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// Copy every inbound header, then delete the denylist and override identity headers.
    #[default]
    PassthroughMinusDenylist,
    /// Start empty and set only Host, User-Agent, Content-Type and Authorization.
    WhitelistOnly,
}

/// What the outbound `Host` header carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HostMode {
    /// `host:port` of the upstream.
    #[default]
    Upstream,
    /// Upstream host without the port.
    UpstreamHostOnly,
    /// No explicit Host; the transport derives it from the destination URI.
    Transport,
}

/// Outbound header policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderPolicyConfig {
    pub strategy: HeaderStrategy,

    pub host: HostMode,

    /// Fixed browser-identifying User-Agent sent upstream.
    pub user_agent: String,

    /// Overwrite Origin and Referer with the upstream base URL (passthrough strategy only).
    pub spoof_origin: bool,

    /// Edge-injected headers that must never reach the upstream.
    pub denylist: Vec<String>,

    /// Forward the inbound Authorization header.
    pub forward_authorization: bool,
}

impl Default for HeaderPolicyConfig {
    fn default() -> Self {
        Self {
            strategy: HeaderStrategy::default(),
            host: HostMode::default(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            spoof_origin: true,
            denylist: default_denylist(),
            forward_authorization: true,
        }
    }
}

fn default_denylist() -> Vec<String> {
    [
        "cf-connecting-ip",
        "cf-ipcountry",
        "cf-ray",
        "cf-visitor",
        "cf-worker",
        "cdn-loop",
        "x-forwarded-for",
        "x-forwarded-proto",
        "x-forwarded-host",
        "x-real-ip",
        "true-client-ip",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Body forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Methods whose inbound body is never sent upstream. Matched case-insensitively.
    pub safe_methods: Vec<String>,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            safe_methods: vec!["GET".to_string(), "HEAD".to_string()],
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time to wait for upstream response headers, in seconds. 0 disables.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Routes answered by the edge without contacting the upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Target of the `GET /` redirect.
    pub root_redirect: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            root_redirect: "https://example.com/".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

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
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
