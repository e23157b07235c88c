//! Live satellite tracking engine
//!
//! Loads a catalog of two-line element sets (live from CelesTrak, or an
//! embedded snapshot), propagates every object once per tick with SGP4, and
//! publishes geodetic positions plus the selected object's orbit ring.

pub mod config;
pub mod orbital;
pub mod tle;
pub mod tracking;

pub use config::TrackerConfig;
