//! Coordinate transformation utilities for orbital mechanics

use chrono::{DateTime, Datelike, Timelike, Utc};
use glam::DVec3;

/// WGS-84 equatorial radius
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Geodetic position; angles in degrees, altitude in km above the ellipsoid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Geodetic {
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}

/// Compute the Julian Date (UTC) for a given timestamp.
/// Uses the standard Gregorian calendar to JD conversion.
pub fn julian_date_utc(t: DateTime<Utc>) -> f64 {
    let mut y = t.year();
    let mut m = t.month() as i32;
    let d = t.day() as i32;

    let hour = t.hour() as f64;
    let minute = t.minute() as f64;
    let sec = t.second() as f64 + (t.nanosecond() as f64) * 1e-9_f64;
    let day_fraction = (hour + (minute + sec / 60.0) / 60.0) / 24.0;

    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    let jd0 = (365.25 * (y as f64 + 4716.0)).floor()
        + (30.6001 * ((m + 1) as f64)).floor()
        + d as f64
        + b
        - 1524.5;

    jd0 + day_fraction
}

/// Greenwich Mean Sidereal Time (radians) using the IAU 1982 polynomial.
/// Assumes UT1 ~= UTC, which is plenty for visualization.
pub fn gmst_rad(t: DateTime<Utc>) -> f64 {
    let jd = julian_date_utc(t);
    let t_cent = (jd - 2451545.0) / 36525.0; // Julian centuries from J2000.0

    let gmst_sec =
        67310.54841 + (876600.0 * 3600.0 + 8640184.812866) * t_cent + 0.093104 * t_cent * t_cent
            - 6.2e-6 * t_cent * t_cent * t_cent;

    let sec_in_day = 86400.0_f64;
    gmst_sec.rem_euclid(sec_in_day) * (std::f64::consts::TAU / sec_in_day)
}

/// Rotate ECI (TEME) -> ECEF using simple GMST rotation about Z
pub fn eci_to_ecef_km(eci: DVec3, gmst: f64) -> DVec3 {
    let (s, c) = gmst.sin_cos();
    let x = c * eci.x + s * eci.y;
    let y = -s * eci.x + c * eci.y;
    DVec3::new(x, y, eci.z)
}

/// Earth-fixed cartesian (km) to WGS-84 geodetic, iterating on latitude
pub fn ecef_to_geodetic(ecef: DVec3) -> Geodetic {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let p = ecef.x.hypot(ecef.y);
    let longitude = ecef.y.atan2(ecef.x);

    let mut lat = ecef.z.atan2(p * (1.0 - e2));
    let mut n = WGS84_A_KM;
    for _ in 0..20 {
        let s = lat.sin();
        n = WGS84_A_KM / (1.0 - e2 * s * s).sqrt();
        let next = (ecef.z + e2 * n * s).atan2(p);
        let done = (next - lat).abs() < 1e-12;
        lat = next;
        if done {
            break;
        }
    }

    // Form that stays finite at the poles
    let (s, c) = lat.sin_cos();
    let altitude = p * c + (ecef.z + e2 * n * s) * s - n;

    Geodetic {
        latitude: lat.to_degrees(),
        longitude: longitude.to_degrees(),
        altitude,
    }
}

/// Inertial position to geodetic using the supplied sidereal angle
pub fn eci_to_geodetic(eci: DVec3, gmst: f64) -> Geodetic {
    ecef_to_geodetic(eci_to_ecef_km(eci, gmst))
}
