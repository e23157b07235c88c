//! Render-ready values published by the tracker

use crate::orbital::{GeodeticSample, TimeBasis};
use crate::tle::{Classification, OrbitalElementSet};
use serde::Serialize;

/// Where one cataloged object is at the current tick
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackedObjectPosition {
    pub name: String,
    pub classification: Classification,
    /// Degrees, [-90, 90]
    pub latitude: f64,
    /// Degrees, [-180, 180]
    pub longitude: f64,
    /// km above the WGS-84 ellipsoid
    pub altitude: f64,
    /// km/s
    pub speed: f64,
    /// Time basis shared by every position of the same tick
    pub epoch: TimeBasis,
}

impl TrackedObjectPosition {
    pub fn new(set: &OrbitalElementSet, sample: GeodeticSample) -> Self {
        Self {
            name: set.name.clone(),
            classification: set.classification,
            latitude: sample.latitude,
            longitude: sample.longitude,
            altitude: sample.altitude,
            speed: sample.speed,
            epoch: sample.basis,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl From<&GeodeticSample> for GeoPoint {
    fn from(sample: &GeodeticSample) -> Self {
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            altitude: sample.altitude,
        }
    }
}

/// Closed ring covering one orbital period of the selected object
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrbitPath {
    pub name: String,
    pub points: Vec<GeoPoint>,
    pub color: &'static str,
    pub period_minutes: f64,
}

impl OrbitPath {
    pub fn is_closed(&self) -> bool {
        matches!((self.points.first(), self.points.last()), (Some(a), Some(b)) if a == b)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectedTelemetry {
    pub position: TrackedObjectPosition,
    /// Carried over from an earlier tick because this tick's propagation failed
    pub stale: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    AwaitingCatalog,
    Tracking,
    /// Catalog loaded but holds no usable element sets
    NoObjectsAvailable,
}

/// Everything the visualization surface needs for one tick
#[derive(Clone, Debug, Serialize)]
pub struct TrackingSnapshot {
    pub status: TrackingStatus,
    pub tick: u64,
    pub basis: Option<TimeBasis>,
    pub positions: Vec<TrackedObjectPosition>,
    pub selection: Option<String>,
    pub telemetry: Option<SelectedTelemetry>,
    pub orbit_path: Option<OrbitPath>,
}

impl TrackingSnapshot {
    pub fn with_status(status: TrackingStatus, tick: u64) -> Self {
        Self {
            status,
            tick,
            basis: None,
            positions: Vec::new(),
            selection: None,
            telemetry: None,
            orbit_path: None,
        }
    }
}
