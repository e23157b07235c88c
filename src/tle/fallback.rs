//! Embedded element sets used when live acquisition is unavailable.
//!
//! The snapshot covers every classification: two crewed stations, a fixed
//! debris set, named science satellites, and a bounded constellation of
//! synthetic active satellites generated from a template orbit.

use crate::tle::parser::{parse_catalog_text, tle_checksum};
use crate::tle::types::{Classification, OrbitalElementSet, TleRecord};

/// Group label attached to every embedded element set
pub const FALLBACK_GROUP: &str = "fallback";

/// Group label for embedded debris merged into a live catalog
pub const DEBRIS_GROUP: &str = "debris";

/// Upper bound on generated active entries
pub const MAX_SYNTHETIC_ACTIVE: usize = 99;

pub const STATION_TLES: &str = r#"
ISS (ZARYA)
1 25544U 98067A   24226.56250000  .00007211  00000-0  13379-3 0  9991
2 25544  51.6422 266.4643 0007888 121.4429 238.6624 15.49494792423450
CSS (TIANHE)
1 48274U 21035A   24226.50000000  .00021000  00000-0  24000-3 0  9999
2 48274  41.4660 120.0000 0005000 300.0000  60.0000 15.60000000190007
"#;

/// Always appended to live catalogs; the remote groups carry no debris
pub const DEBRIS_TLES: &str = r#"
COSMOS 2251 DEB
1 34427U 93036SX  24226.50000000  .00000800  00000-0  25000-3 0  9990
2 34427  74.0300 200.1000 0120000  80.0000 281.0000 14.42000000800000
FENGYUN 1C DEB
1 29228U 99025AKS 24226.50000000  .00000500  00000-0  20000-3 0  9999
2 29228  98.6000  45.0000 0080000 150.0000 211.0000 14.35000000900007
IRIDIUM 33 DEB
1 33773U 97051C   24226.50000000  .00000300  00000-0  10000-3 0  9993
2 33773  86.3900 310.0000 0050000  10.0000 350.0000 14.34000000700008
"#;

pub const SCIENCE_TLES: &str = r#"
HST
1 20580U 90037B   24226.50000000  .00001000  00000-0  50000-4 0  9995
2 20580  28.4700 100.0000 0002500  90.0000 270.0000 15.15000000500001
"#;

// Drag-free template so generated entries stay propagatable far from epoch.
const ACTIVE_TEMPLATE_LINE1: &str =
    "1 90000U 24001A   24226.50000000  .00000000  00000-0  00000-0 0  9997";
const ACTIVE_INCLINATION_DEG: f64 = 53.0;
const ACTIVE_ECCENTRICITY: &str = "0001000";
const ACTIVE_ARG_PERIGEE_DEG: f64 = 90.0;
const ACTIVE_MEAN_MOTION: f64 = 15.06;
const ACTIVE_PLANES: usize = 6;
const ACTIVE_FIRST_NORAD: u32 = 90001;

fn with_checksum(mut body: String) -> String {
    let sum = tle_checksum(&body);
    body.push(char::from(b'0' + sum));
    body
}

/// Generate `count` synthetic active records spread over a few orbital planes
pub fn synthetic_active_records(count: usize) -> Vec<TleRecord> {
    let count = count.min(MAX_SYNTHETIC_ACTIVE);
    let per_plane = count.div_ceil(ACTIVE_PLANES).max(1);

    (0..count)
        .map(|i| {
            let norad = ACTIVE_FIRST_NORAD + i as u32;
            let plane = i % ACTIVE_PLANES;
            let slot = i / ACTIVE_PLANES;
            let raan = (plane as f64 * 360.0 / ACTIVE_PLANES as f64) % 360.0;
            let mean_anomaly =
                (slot as f64 * 360.0 / per_plane as f64 + plane as f64 * 15.0) % 360.0;

            let line1 = with_checksum(format!("1 {:05}{}", norad, &ACTIVE_TEMPLATE_LINE1[7..68]));
            let line2 = with_checksum(format!(
                "2 {:05} {:8.4} {:8.4} {} {:8.4} {:8.4} {:11.8}{:05}",
                norad,
                ACTIVE_INCLINATION_DEG,
                raan,
                ACTIVE_ECCENTRICITY,
                ACTIVE_ARG_PERIGEE_DEG,
                mean_anomaly,
                ACTIVE_MEAN_MOTION,
                1,
            ));

            TleRecord {
                name: Some(format!("STARLINK-SIM-{:02}", i + 1)),
                line1,
                line2,
            }
        })
        .collect()
}

/// Hand-curated debris sets, parsed and labeled with `group`
pub fn debris_sets(group: &str) -> Vec<OrbitalElementSet> {
    parse_catalog_text(DEBRIS_TLES, Classification::Debris, group)
}

/// The full embedded snapshot, parsed. Unparseable entries are dropped.
pub fn fallback_sets(synthetic_active: usize) -> Vec<OrbitalElementSet> {
    let mut sets = parse_catalog_text(STATION_TLES, Classification::Station, FALLBACK_GROUP);
    sets.extend(debris_sets(FALLBACK_GROUP));

    let synthetic: String = synthetic_active_records(synthetic_active)
        .into_iter()
        .map(|r| format!("{}\n{}\n{}\n", r.name.unwrap_or_default(), r.line1, r.line2))
        .collect();
    sets.extend(parse_catalog_text(
        &synthetic,
        Classification::Active,
        FALLBACK_GROUP,
    ));
    sets.extend(parse_catalog_text(
        SCIENCE_TLES,
        Classification::Active,
        FALLBACK_GROUP,
    ));
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_lines_are_well_formed() {
        for record in synthetic_active_records(24) {
            assert_eq!(record.line1.len(), 69, "{}", record.line1);
            assert_eq!(record.line2.len(), 69, "{}", record.line2);
            let check1 = record.line1.as_bytes()[68] - b'0';
            let check2 = record.line2.as_bytes()[68] - b'0';
            assert_eq!(check1, tle_checksum(&record.line1));
            assert_eq!(check2, tle_checksum(&record.line2));
            assert_eq!(&record.line1[2..7], &record.line2[2..7]);
        }
    }

    #[test]
    fn test_synthetic_count_is_bounded() {
        assert_eq!(synthetic_active_records(500).len(), MAX_SYNTHETIC_ACTIVE);
        assert!(synthetic_active_records(0).is_empty());
    }

    #[test]
    fn test_fallback_covers_every_classification() {
        let sets = fallback_sets(12);
        let count = |c| sets.iter().filter(|s| s.classification == c).count();
        assert_eq!(count(Classification::Station), 2);
        assert_eq!(count(Classification::Debris), 3);
        // 12 synthetic plus the named science satellite
        assert_eq!(count(Classification::Active), 13);
        assert!(sets.iter().any(|s| s.name == "HST"));
        assert!(sets.iter().all(|s| s.group == FALLBACK_GROUP));
    }

    #[test]
    fn test_embedded_records_all_parse() {
        for text in [STATION_TLES, DEBRIS_TLES, SCIENCE_TLES] {
            let raw = crate::tle::parser::split_records(text).len();
            let parsed = parse_catalog_text(text, Classification::Active, FALLBACK_GROUP).len();
            assert_eq!(raw, parsed);
        }
    }
}
