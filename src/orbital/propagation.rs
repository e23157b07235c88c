//! Orbital propagation utilities
//!
//! The adapter turns an element set and an instant into a geodetic sample.
//! The propagation model itself sits behind [`Propagator`] so SGP4 can be
//! replaced, for instance by a fake in tests.

use crate::orbital::coordinates::eci_to_geodetic;
use crate::orbital::time::TimeBasis;
use crate::tle::OrbitalElementSet;
use chrono::{DateTime, Utc};
use glam::DVec3;

/// Calculate minutes since epoch for SGP4 propagation
pub fn minutes_since_epoch(sim_utc: DateTime<Utc>, epoch: DateTime<Utc>) -> f64 {
    let delta = sim_utc - epoch;
    delta.num_seconds() as f64 / 60.0 + (delta.subsec_nanos() as f64) / 60.0 / 1.0e9
}

/// TEME position (km) and velocity (km/s)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InertialState {
    pub position: DVec3,
    pub velocity: DVec3,
}

pub trait Propagator {
    /// Inertial state at `instant`, or `None` when the model gives up
    fn inertial_state(
        &self,
        set: &OrbitalElementSet,
        instant: DateTime<Utc>,
    ) -> Option<InertialState>;
}

/// SGP4 via the precomputed constants stored on each element set
#[derive(Clone, Copy, Debug, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn inertial_state(
        &self,
        set: &OrbitalElementSet,
        instant: DateTime<Utc>,
    ) -> Option<InertialState> {
        let mins = minutes_since_epoch(instant, set.epoch_utc);
        let prediction = set
            .constants
            .propagate(sgp4::MinutesSinceEpoch(mins))
            .ok()?;
        Some(InertialState {
            position: DVec3::from_array(prediction.position),
            velocity: DVec3::from_array(prediction.velocity),
        })
    }
}

/// One propagated position in geodetic terms
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodeticSample {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    /// Magnitude of the inertial velocity, km/s
    pub speed: f64,
    pub basis: TimeBasis,
}

#[derive(Clone, Debug, Default)]
pub struct PropagationAdapter<P = Sgp4Propagator> {
    propagator: P,
}

impl<P: Propagator> PropagationAdapter<P> {
    pub fn new(propagator: P) -> Self {
        Self { propagator }
    }

    /// Propagate to `instant` using that instant's own sidereal angle
    pub fn propagate(
        &self,
        set: &OrbitalElementSet,
        instant: DateTime<Utc>,
    ) -> Option<GeodeticSample> {
        self.propagate_with_basis(set, instant, TimeBasis::at(instant))
    }

    /// Propagate to `instant` but rotate into the Earth frame with `basis`.
    ///
    /// Returns `None` for model failures and for any non-finite output.
    pub fn propagate_with_basis(
        &self,
        set: &OrbitalElementSet,
        instant: DateTime<Utc>,
        basis: TimeBasis,
    ) -> Option<GeodeticSample> {
        let state = self.propagator.inertial_state(set, instant)?;
        if !state.position.is_finite() || !state.velocity.is_finite() {
            return None;
        }
        if state.position.length_squared() == 0.0 {
            return None;
        }

        let geo = eci_to_geodetic(state.position, basis.gmst);
        let speed = state.velocity.length();
        if !geo.is_finite() || !speed.is_finite() {
            return None;
        }

        Some(GeodeticSample {
            latitude: geo.latitude,
            longitude: geo.longitude,
            altitude: geo.altitude,
            speed,
            basis,
        })
    }
}
