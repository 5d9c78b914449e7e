//! Test data generators for creating synthetic pressure fields.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. Pressures are in hPa.

use chrono::{DateTime, Duration, TimeZone, Utc};
use ndarray::{Array3, Array4};

use lwt_common::{CoordAxis, PressureField};

use crate::fixtures::grid::EUROPE;

/// Standard sea-level pressure used as the background of every generator.
pub const BACKGROUND_HPA: f64 = 1013.25;

/// Creates a regularly spaced coordinate axis.
///
/// # Panics
///
/// Panics if the values do not form a valid axis (zero step, empty, ...).
///
/// # Example
///
/// ```
/// use test_utils::regular_axis;
///
/// let lat = regular_axis("latitude", 60.0, -2.5, 5);
/// assert_eq!(lat.values(), &[60.0, 57.5, 55.0, 52.5, 50.0]);
/// ```
pub fn regular_axis(name: &str, start: f64, step: f64, count: usize) -> CoordAxis {
    CoordAxis::regular(name, start, step, count)
        .unwrap_or_else(|e| panic!("invalid test axis '{}': {}", name, e))
}

/// Creates `n` daily time labels starting 2000-01-01 12:00 UTC.
pub fn daily_times(n: usize) -> Vec<DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    (0..n).map(|d| start + Duration::days(d as i64)).collect()
}

/// Creates a field without ensemble members from a function of `(lat, lon)`.
///
/// Every time step holds the same pattern.
pub fn field_from_fn(
    lat: CoordAxis,
    lon: CoordAxis,
    n_times: usize,
    pressure: impl Fn(f64, f64) -> f64,
) -> PressureField {
    let data = Array3::from_shape_fn((n_times, lat.len(), lon.len()), |(_, i, j)| {
        pressure(lat.values()[i], lon.values()[j])
    });
    PressureField::from_3d(data, daily_times(n_times), lat, lon)
        .unwrap_or_else(|e| panic!("invalid test field: {}", e))
}

/// Creates an ensemble field from a function of `(member index, lat, lon)`.
///
/// Members are labeled `0..n_members`.
pub fn ensemble_field_from_fn(
    lat: CoordAxis,
    lon: CoordAxis,
    n_times: usize,
    n_members: usize,
    pressure: impl Fn(usize, f64, f64) -> f64,
) -> PressureField {
    let data = Array4::from_shape_fn(
        (n_times, n_members, lat.len(), lon.len()),
        |(_, m, i, j)| pressure(m, lat.values()[i], lon.values()[j]),
    );
    let members = (0..n_members as i64).collect();
    PressureField::from_4d(data, daily_times(n_times), members, lat, lon)
        .unwrap_or_else(|e| panic!("invalid test ensemble: {}", e))
}

/// Creates a field with the same pressure everywhere.
pub fn flat_pressure_field(lat: CoordAxis, lon: CoordAxis, n_times: usize) -> PressureField {
    field_from_fn(lat, lon, n_times, |_, _| BACKGROUND_HPA)
}

/// Creates a field whose pressure falls by `hpa_per_degree` per degree of
/// latitude northward, with no east-west variation.
///
/// A positive gradient gives positive `W`, a negative one negative `W`.
pub fn meridional_gradient(
    lat: CoordAxis,
    lon: CoordAxis,
    n_times: usize,
    hpa_per_degree: f64,
) -> PressureField {
    field_from_fn(lat, lon, n_times, |la, _| BACKGROUND_HPA - hpa_per_degree * la)
}

/// Westerly test field of 1 hPa per degree on the [`EUROPE`] grid, with
/// the given axis names.
///
/// Centers at 50N see `W = 10`, `S = 0` and a small positive `Z`.
pub fn meridional_gradient_field(lat_name: &str, lon_name: &str, n_times: usize) -> PressureField {
    meridional_gradient(
        EUROPE.latitude(lat_name),
        EUROPE.longitude(lon_name),
        n_times,
        1.0,
    )
}

/// Creates a field whose pressure rises by `hpa_per_degree` per degree of
/// longitude eastward.
pub fn zonal_gradient(
    lat: CoordAxis,
    lon: CoordAxis,
    n_times: usize,
    hpa_per_degree: f64,
) -> PressureField {
    field_from_fn(lat, lon, n_times, |_, lo| BACKGROUND_HPA + hpa_per_degree * lo)
}

/// Creates a Gaussian pressure anomaly centered on `(center_lat, center_lon)`.
///
/// A positive `depth_hpa` gives a low (cyclone), a negative one a high.
/// Distances are measured in plain degrees.
pub fn pressure_system(
    lat: CoordAxis,
    lon: CoordAxis,
    n_times: usize,
    (center_lat, center_lon): (f64, f64),
    depth_hpa: f64,
    radius_deg: f64,
) -> PressureField {
    field_from_fn(lat, lon, n_times, |la, lo| {
        let d2 = (la - center_lat).powi(2) + (lo - center_lon).powi(2);
        BACKGROUND_HPA - depth_hpa * (-d2 / (2.0 * radius_deg * radius_deg)).exp()
    })
}

/// Creates a field whose value encodes its own coordinates:
/// `lat * 1000 + lon`.
///
/// This makes it easy to verify which grid point a sample came from.
pub fn coordinate_encoded_field(lat: CoordAxis, lon: CoordAxis, n_times: usize) -> PressureField {
    field_from_fn(lat, lon, n_times, |la, lo| la * 1000.0 + lo)
}
