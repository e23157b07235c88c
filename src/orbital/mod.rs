//! Orbital mechanics module
//!
//! This module handles orbital calculations, coordinate transformations,
//! and the per-tick time basis for satellite propagation.

pub mod coordinates;
pub mod propagation;
pub mod time;

pub use coordinates::{Geodetic, eci_to_ecef_km, eci_to_geodetic, ecef_to_geodetic, gmst_rad};
pub use propagation::{
    GeodeticSample, InertialState, PropagationAdapter, Propagator, Sgp4Propagator,
    minutes_since_epoch,
};
pub use time::TimeBasis;
