//! Tracker configuration
//!
//! Every section has working defaults; a JSON file may override any subset
//! of fields.

use crate::tle::{CelestrakGroup, Classification};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CELESTRAK_GP_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// One remote group to acquire at startup
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GroupConfig {
    /// CelesTrak `GROUP` query value
    pub name: String,
    pub classification: Classification,
    /// Keep at most this many records from the group
    #[serde(default)]
    pub limit: Option<usize>,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>, classification: Classification, limit: Option<usize>) -> Self {
        Self {
            name: name.into(),
            classification,
            limit,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub groups: Vec<GroupConfig>,
    pub request_timeout_secs: u64,
    /// Skip the network and load the embedded snapshot
    pub offline: bool,
    /// Generated active entries in the embedded snapshot
    pub synthetic_active: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: CELESTRAK_GP_URL.to_string(),
            groups: vec![
                GroupConfig::new(CelestrakGroup::Stations.query_name(), Classification::Station, None),
                GroupConfig::new(CelestrakGroup::Starlink.query_name(), Classification::Active, Some(300)),
                GroupConfig::new(CelestrakGroup::Science.query_name(), Classification::Active, None),
            ],
            request_timeout_secs: 10,
            offline: false,
            synthetic_active: 24,
        }
    }
}

impl CatalogConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub tick_interval_ms: u64,
    /// Samples per orbit ring, not counting the closing point
    pub orbit_path_samples: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            orbit_path_samples: 200,
        }
    }
}

impl SchedulerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub catalog: CatalogConfig,
    pub scheduler: SchedulerConfig,
}

impl TrackerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid tracker config")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.scheduler.tick_interval(), Duration::from_secs(1));
        assert_eq!(cfg.scheduler.orbit_path_samples, 200);
        let names: Vec<_> = cfg.catalog.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["stations", "starlink", "science"]);
        assert!(!cfg.catalog.offline);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = TrackerConfig::from_json_str(
            r#"{ "catalog": { "offline": true, "groups": [
                { "name": "gps-ops", "classification": "active", "limit": 10 }
            ] }, "scheduler": { "orbit_path_samples": 90 } }"#,
        )
        .unwrap();
        assert!(cfg.catalog.offline);
        assert_eq!(
            cfg.catalog.groups,
            vec![GroupConfig::new("gps-ops", Classification::Active, Some(10))]
        );
        assert_eq!(cfg.catalog.base_url, CELESTRAK_GP_URL);
        assert_eq!(cfg.scheduler.orbit_path_samples, 90);
        assert_eq!(cfg.scheduler.tick_interval_ms, 1000);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(TrackerConfig::from_json_str("{ not json").is_err());
    }
}
