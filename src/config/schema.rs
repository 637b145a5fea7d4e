//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::navigation::HistoryMode;
use crate::routing::RouteSection;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterAppConfig {
    /// Router behavior (history mode, base, matching).
    pub router: RouterConfig,

    /// Development server settings.
    pub server: ServerConfig,

    /// Where views are loaded from.
    pub views: ViewsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route sections in precedence order. Empty means the built-in tables.
    pub sections: Vec<RouteSection>,
}

/// Router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// History mode used for links and browser locations.
    pub history: HistoryMode,

    /// Base path the application is served under.
    pub base: String,

    /// Case-sensitive static segment matching.
    pub sensitive: bool,

    /// View for unmatched locations. Unset means misses are reported as such.
    pub not_found_view: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            history: HistoryMode::Web,
            base: "/".to_string(),
            sensitive: false,
            not_found_view: None,
        }
    }
}

/// Development server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5173").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// HTML shell served for matched locations. Unset uses a built-in page.
    pub shell_path: Option<String>,

    /// Reload the route table when the config file changes.
    pub watch_config: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5173".to_string(),
            request_timeout_secs: 30,
            shell_path: None,
            watch_config: true,
        }
    }
}

/// View source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Directory holding view files.
    pub root: String,

    /// File extension appended to view references.
    pub extension: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            root: "views".to_string(),
            extension: "html".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
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
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterAppConfig::default();
        assert_eq!(config.router.history, HistoryMode::Web);
        assert_eq!(config.router.base, "/");
        assert!(config.router.not_found_view.is_none());
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.views.extension, "html");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(config.sections.is_empty());
    }

    #[test]
    fn test_minimal_toml() {
        let config: RouterAppConfig = toml::from_str(
            r#"
            [router]
            history = "hash"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.router.history, HistoryMode::Hash);
        assert_eq!(config.router.base, "/");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.server.bind_address, "127.0.0.1:5173");
    }
}
