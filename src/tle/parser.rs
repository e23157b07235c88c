//! TLE parsing utilities

use crate::tle::types::{Classification, OrbitalElementSet, TleRecord};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Parse TLE epoch from line 1 to UTC DateTime
pub fn parse_tle_epoch_to_utc(line1: &str) -> Option<DateTime<Utc>> {
    // TLE line1 epoch fields (columns 19–32, 1-based; 18..32 0-based)
    let s = line1.get(18..32)?;
    let mut parts = s.trim().split('.');
    let yyddd = parts.next()?;
    let frac = parts.next().unwrap_or("0");
    if yyddd.len() < 3 {
        return None;
    }
    let (yy_str, ddd_str) = yyddd.split_at(2);
    let yy: i32 = yy_str.parse().ok()?;
    let ddd: i64 = ddd_str.parse().ok()?;
    let year = if yy >= 57 { 1900 + yy } else { 2000 + yy };
    let jan1 = chrono::NaiveDate::from_ymd_opt(year, 1, 1)?;
    let date = jan1.checked_add_signed(chrono::Duration::days(ddd - 1))?;
    let frac_day: f64 = format!("0.{frac}").parse().ok()?;
    let nanos = (frac_day * 86_400.0 * 1e9).round() as i64;
    let ndt = date.and_hms_opt(0, 0, 0)? + chrono::Duration::nanoseconds(nanos);
    Some(DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
}

/// TLE checksum: digit sum plus one per minus sign over the first 68 columns, mod 10
pub fn tle_checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .take(68)
        .map(|b| match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

fn clean_line(raw: &str) -> &str {
    raw.trim_matches(|c| c == '\u{feff}' || c == '\r' || c == '\n' || c == ' ')
}

/// Split a text payload of stacked element records into raw records.
///
/// Accepts both 3-line (name + two element lines) and bare 2-line records,
/// tolerating BOMs, CRLF endings and blank lines. Lines that belong to no
/// record are skipped.
pub fn split_records(body: &str) -> Vec<TleRecord> {
    let lines: Vec<&str> = body
        .lines()
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if i + 1 < lines.len() && lines[i].starts_with("1 ") && lines[i + 1].starts_with("2 ") {
            // Name line immediately before, if it is not an element line itself
            let name = (i > 0 && !lines[i - 1].starts_with("1 ") && !lines[i - 1].starts_with("2 "))
                .then(|| lines[i - 1].to_string());
            records.push(TleRecord {
                name,
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else {
            i += 1;
        }
    }
    records
}

/// Parse one raw record into an element set ready for propagation
pub fn parse_record(
    record: &TleRecord,
    classification: Classification,
    group: &str,
) -> Result<OrbitalElementSet> {
    let elements = sgp4::Elements::from_tle(
        record.name.clone(),
        record.line1.as_bytes(),
        record.line2.as_bytes(),
    )
    .map_err(|e| anyhow!("elements error: {e}"))?;
    let constants =
        sgp4::Constants::from_elements(&elements).map_err(|e| anyhow!("constants error: {e}"))?;
    let epoch_utc = parse_tle_epoch_to_utc(&record.line1).context("unreadable epoch")?;
    let name = record
        .name
        .clone()
        .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

    Ok(OrbitalElementSet {
        name,
        classification,
        group: group.to_string(),
        norad_id: elements.norad_id,
        line1: record.line1.clone(),
        line2: record.line2.clone(),
        epoch_utc,
        elements,
        constants,
    })
}

/// Parse a payload into element sets, dropping (and logging) any record that fails
pub fn parse_catalog_text(
    body: &str,
    classification: Classification,
    group: &str,
) -> Vec<OrbitalElementSet> {
    split_records(body)
        .iter()
        .filter_map(|record| {
            parse_record(record, classification, group)
                .with_context(|| {
                    format!(
                        "record {}",
                        record.name.as_deref().unwrap_or(record.line1.as_str())
                    )
                })
                .map_err(|e| warn!("[TLE PARSE] group={} dropped: {:#}", group, e))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS: &str = "ISS (ZARYA)
1 25544U 98067A   24226.56250000  .00007211  00000-0  13379-3 0  9991
2 25544  51.6422 266.4643 0007888 121.4429 238.6624 15.49494792423450
";

    #[test]
    fn test_parse_tle_epoch() {
        let line1 = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
        let epoch = parse_tle_epoch_to_utc(line1).unwrap();
        assert_eq!(epoch.format("%Y-%m-%d").to_string(), "2008-09-20");

        assert!(parse_tle_epoch_to_utc("too short").is_none());
    }

    #[test]
    fn test_tle_checksum_known_lines() {
        let line1 = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
        let line2 = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
        assert_eq!(tle_checksum(line1), 7);
        assert_eq!(tle_checksum(line2), 7);
    }

    #[test]
    fn test_split_records_with_crlf_and_bom() {
        let body = format!("\u{feff}{}", ISS.replace('\n', "\r\n"));
        let records = split_records(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("ISS (ZARYA)"));
        assert!(records[0].line1.starts_with("1 25544"));
    }

    #[test]
    fn test_split_records_without_name_line() {
        let body = ISS.lines().skip(1).collect::<Vec<_>>().join("\n");
        let records = split_records(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, None);
    }

    #[test]
    fn test_parse_catalog_text_drops_bad_records() {
        let corrupted = ISS.replace(" 51.6422 ", " 51.64X2 ");
        let body = format!("{ISS}{corrupted}");
        let sets = parse_catalog_text(&body, Classification::Station, "stations");
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name, "ISS (ZARYA)");
        assert_eq!(sets[0].norad_id, 25544);
        assert_eq!(sets[0].group, "stations");
    }

    #[test]
    fn test_parse_record_unnamed_gets_norad_label() {
        let record = split_records(ISS).remove(0);
        let record = TleRecord {
            name: None,
            ..record
        };
        let set = parse_record(&record, Classification::Station, "stations").unwrap();
        assert_eq!(set.name, "NORAD 25544");
    }

    #[test]
    fn test_period_from_mean_motion() {
        let set = parse_catalog_text(ISS, Classification::Station, "stations").remove(0);
        let period = set.period_minutes().unwrap();
        assert!((period - 1440.0 / 15.49494792).abs() < 1e-6, "period {}", period);
    }
}
