//! Shared time basis for one propagation pass

use crate::orbital::coordinates::gmst_rad;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Instant plus the sidereal angle derived from it. Every position computed
/// in one tick carries the same basis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TimeBasis {
    pub instant: DateTime<Utc>,
    /// Greenwich mean sidereal time, radians in [0, 2π)
    pub gmst: f64,
}

impl TimeBasis {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            gmst: gmst_rad(instant),
        }
    }
}
