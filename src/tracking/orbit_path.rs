//! One-period orbit ring for the selected object
//!
//! Every sample is rotated into the Earth frame with the tick's sidereal
//! angle instead of its own. The ring therefore closes on itself and holds
//! still between ticks, at the cost of each point's exact ground longitude.

use crate::orbital::{PropagationAdapter, Propagator, TimeBasis};
use crate::tle::OrbitalElementSet;
use crate::tracking::types::{GeoPoint, OrbitPath};
use chrono::Duration;

pub const DEFAULT_ORBIT_SAMPLES: usize = 200;

#[derive(Clone, Copy, Debug)]
pub struct OrbitPathProjector {
    samples: usize,
}

impl Default for OrbitPathProjector {
    fn default() -> Self {
        Self::new(DEFAULT_ORBIT_SAMPLES)
    }
}

impl OrbitPathProjector {
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(1),
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Sample one period starting at `basis.instant`.
    ///
    /// Failed samples, including sample times outside the representable
    /// date range, are left out. Returns `None` when the period is undefined
    /// or no sample propagates.
    pub fn project<P: Propagator>(
        &self,
        adapter: &PropagationAdapter<P>,
        set: &OrbitalElementSet,
        basis: TimeBasis,
    ) -> Option<OrbitPath> {
        let period_minutes = set.period_minutes()?;
        let period_us = period_minutes * 60.0 * 1e6;

        let mut points: Vec<GeoPoint> = (0..self.samples)
            .filter_map(|i| {
                let offset_us = (period_us * i as f64 / self.samples as f64).round() as i64;
                // Very long periods can step past the representable calendar
                let instant = basis
                    .instant
                    .checked_add_signed(Duration::microseconds(offset_us))?;
                adapter
                    .propagate_with_basis(set, instant, basis)
                    .map(|s| GeoPoint::from(&s))
            })
            .collect();

        let first = *points.first()?;
        points.push(first);

        Some(OrbitPath {
            name: set.name.clone(),
            points,
            color: set.classification.color_hex(),
            period_minutes,
        })
    }
}
