//! TLE (Two-Line Element) data management module
//!
//! This module handles TLE fetching, parsing, the embedded fallback snapshot,
//! and assembly of the orbital element catalog from external sources like
//! Celestrak.

pub mod fallback;
pub mod fetcher;
pub mod loader;
pub mod parser;
pub mod types;

pub use fetcher::{CelestrakFetcher, CelestrakGroup, GroupSource};
pub use loader::CatalogLoader;
pub use types::{Catalog, CatalogSource, Classification, OrbitalElementSet, TleRecord};
