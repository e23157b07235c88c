//! TLE data types and the orbital element catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad category of a tracked object, used for display color and filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Station,
    Debris,
    Active,
}

impl Classification {
    /// Display color of points and orbit rings for this class
    pub fn color_hex(self) -> &'static str {
        match self {
            Classification::Station => "#ffd166",
            Classification::Debris => "#ef476f",
            Classification::Active => "#4cc9ff",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Station => "station",
            Classification::Debris => "debris",
            Classification::Active => "active",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw 3-line record before SGP4 parsing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TleRecord {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

/// One parsed orbital element set. Immutable once loaded.
pub struct OrbitalElementSet {
    pub name: String,
    pub classification: Classification,
    /// Acquisition group this set came from (`"fallback"` for the embedded snapshot, `"debris"` for debris merged into a live catalog)
    pub group: String,
    pub norad_id: u64,
    pub line1: String,
    pub line2: String,
    pub epoch_utc: DateTime<Utc>,
    /// Parsed mean elements
    pub elements: sgp4::Elements,
    /// SGP4 propagator constants
    pub constants: sgp4::Constants,
}

impl OrbitalElementSet {
    /// Mean motion in radians per minute
    pub fn mean_motion_rad_per_min(&self) -> f64 {
        self.elements.mean_motion * std::f64::consts::TAU / 1440.0
    }

    /// Orbital period in minutes, `None` for a non-positive mean motion
    pub fn period_minutes(&self) -> Option<f64> {
        let n = self.mean_motion_rad_per_min();
        (n.is_finite() && n > 0.0).then(|| std::f64::consts::TAU / n)
    }
}

impl fmt::Debug for OrbitalElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrbitalElementSet")
            .field("name", &self.name)
            .field("classification", &self.classification)
            .field("group", &self.group)
            .field("norad_id", &self.norad_id)
            .field("epoch_utc", &self.epoch_utc)
            .finish_non_exhaustive()
    }
}

/// Where the catalog contents came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Live,
    Fallback,
}

/// Ordered collection of element sets, written once at load
#[derive(Debug)]
pub struct Catalog {
    pub source: CatalogSource,
    items: Vec<OrbitalElementSet>,
}

impl Catalog {
    pub fn new(source: CatalogSource, items: Vec<OrbitalElementSet>) -> Self {
        Self { source, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrbitalElementSet> {
        self.items.iter()
    }

    /// First member with the given name; names are not guaranteed unique
    pub fn find(&self, name: &str) -> Option<&OrbitalElementSet> {
        self.items.iter().find(|s| s.name == name)
    }

    pub fn count_by(&self, classification: Classification) -> usize {
        self.items
            .iter()
            .filter(|s| s.classification == classification)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_serde_names() {
        let json = serde_json::to_string(&Classification::Debris).unwrap();
        assert_eq!(json, "\"debris\"");
        let back: Classification = serde_json::from_str("\"station\"").unwrap();
        assert_eq!(back, Classification::Station);
    }

    #[test]
    fn test_classification_colors_are_distinct() {
        let colors = [
            Classification::Station.color_hex(),
            Classification::Debris.color_hex(),
            Classification::Active.color_hex(),
        ];
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }
}
