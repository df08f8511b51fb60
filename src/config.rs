use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rules::{RouteIdCleanup, StopIdMode};

/// Environment variable naming a rules config file when `--config` is absent.
pub const CONFIG_ENV: &str = "GTFS_RULES_CONFIG";

/// Tunable parts of the agency rules, read from a JSON file:
/// ```json
/// {
///   "stop_id_mode": { "mode": "prefix_zone_table", "zones": [{ "prefix": "EE", "offset": 100000 }] },
///   "route_id_cleanup": "two_groups",
///   "locale_aware_labels": true
/// }
/// ```
/// Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub stop_id_mode: StopIdMode,
    pub route_id_cleanup: RouteIdCleanup,
    /// Thread the primary language through the final label cleanup.
    pub locale_aware_labels: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            stop_id_mode: StopIdMode::DirectFromCode,
            route_id_cleanup: RouteIdCleanup::TwoGroups,
            locale_aware_labels: true,
        }
    }
}

impl RulesConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rules config '{path}'"))?;
        let config: RulesConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid rules config '{path}'"))?;
        info!(path, ?config, "Rules config loaded");
        Ok(config)
    }

    /// `path`, else the file named by [`CONFIG_ENV`], else defaults.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match std::env::var(CONFIG_ENV) {
                Ok(path) if !path.is_empty() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}
