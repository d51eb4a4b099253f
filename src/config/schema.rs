//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RautaConfig {
    /// Navigation controller settings.
    pub router: RouterConfig,

    /// Loading bar timings.
    pub indicator: IndicatorConfig,

    /// Settings used by the portal's own route table.
    pub portal: PortalConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Navigation controller configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Origin the application is served from. Navigation targets must be
    /// on it; links to other origins are left to the browser.
    pub origin: String,

    /// When the superseded route's queries are released.
    pub release: ReleasePolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8030".to_string(),
            release: ReleasePolicy::AfterCommit,
        }
    }
}

/// Point in a transition at which the previous route is disposed.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReleasePolicy {
    /// Right after the next route is committed as current.
    #[default]
    AfterCommit,
    /// Once the rendering layer reports the next route as mounted.
    AfterMount,
}

/// Loading indicator timings. These are polish, not correctness.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Minimum time the bar stays in `pending` before it starts fading.
    pub min_visible_ms: u64,

    /// Length of the `settling` fade.
    pub fade_ms: u64,
}

impl IndicatorConfig {
    pub fn min_visible(&self) -> Duration {
        Duration::from_millis(self.min_visible_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            min_visible_ms: 150,
            fade_ms: 300,
        }
    }
}

/// Portal route table configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PortalConfig {
    /// Top-level path segments that never resolve to a realm.
    pub reserved_paths: Vec<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            reserved_paths: vec![
                "favicon.ico".to_string(),
                "robots.txt".to_string(),
                ".well-known".to_string(),
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Output format of the fmt layer.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}
