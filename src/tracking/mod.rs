//! Live tracking module
//!
//! This module drives the fixed-rate tracking loop, projects the selected
//! object's orbit ring, and filters positions by name for the UI.

pub mod orbit_path;
pub mod scheduler;
pub mod search;
pub mod types;

pub use orbit_path::{DEFAULT_ORBIT_SAMPLES, OrbitPathProjector};
pub use scheduler::{SchedulerState, SelectionControl, TrackerHandle, TrackingScheduler};
pub use search::{filter_positions, first_match};
pub use types::{
    GeoPoint, OrbitPath, SelectedTelemetry, TrackedObjectPosition, TrackingSnapshot,
    TrackingStatus,
};
