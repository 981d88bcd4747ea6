//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// The only version-control system the gateway speaks.
pub const SUPPORTED_VCS: &str = "git";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Public site settings used when rendering pages.
    pub site: SiteConfig,

    /// How upstream repositories are queried.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,

    /// Seconds in-flight connections may keep running after shutdown
    /// begins. Zero closes them immediately.
    pub drain_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            drain_timeout_secs: 10,
        }
    }
}

/// Public-facing site settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Host name the vanity import paths live under.
    pub hostname: String,

    /// VCS identifier advertised in the `go-import` meta tag.
    pub vcs: String,

    /// Verbose rendering and logging.
    pub debug: bool,

    /// Analytics tracking id embedded in rendered pages. Empty disables it.
    pub analytics_id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hostname: "gogetver.com".to_string(),
            vcs: SUPPORTED_VCS.to_string(),
            debug: false,
            analytics_id: String::new(),
        }
    }
}

/// Upstream fetch settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// URL scheme used to reach upstream hosts ("https" or "http").
    pub scheme: String,

    /// User-Agent sent with every refs fetch.
    pub user_agent: String,

    /// Total timeout per fetch in seconds. Unset uses the transport default.
    pub timeout_secs: Option<u64>,

    /// Honor `HTTP(S)_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            user_agent: format!("vanity-gateway/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
            use_system_proxy: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
