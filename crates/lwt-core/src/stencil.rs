//! The fixed 16-point sampling stencil.
//!
//! Points are numbered 1..=16 row by row from north to south and west to
//! east within a row:
//!
//! ```text
//!              1     2                    +10°
//!        3     4     5     6              +5°
//!        7     8  x  9    10               0°
//!       11    12    13    14              -5°
//!             15    16                   -10°
//!     -15°   -5°   +5°  +15°
//! ```

use lwt_common::Domain;

/// Number of points in the stencil.
pub const STENCIL_SIZE: usize = 16;

/// Offset of one stencil point from the classification center, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilOffset {
    pub dlat: f64,
    pub dlon: f64,
}

const fn offset(dlat: f64, dlon: f64) -> StencilOffset {
    StencilOffset { dlat, dlon }
}

/// Stencil offsets in point order (index 0 is point 1).
pub const STENCIL: [StencilOffset; STENCIL_SIZE] = [
    offset(10.0, -5.0),
    offset(10.0, 5.0),
    offset(5.0, -15.0),
    offset(5.0, -5.0),
    offset(5.0, 5.0),
    offset(5.0, 15.0),
    offset(0.0, -15.0),
    offset(0.0, -5.0),
    offset(0.0, 5.0),
    offset(0.0, 15.0),
    offset(-5.0, -15.0),
    offset(-5.0, -5.0),
    offset(-5.0, 5.0),
    offset(-5.0, 15.0),
    offset(-10.0, -5.0),
    offset(-10.0, 5.0),
];

impl StencilOffset {
    /// Target latitude for a center latitude. Latitudes never wrap.
    pub fn latitude(&self, center_lat: f64) -> f64 {
        center_lat + self.dlat
    }

    /// Target longitude for a center longitude, wrapped on global domains.
    pub fn longitude(&self, center_lon: f64, domain: Domain) -> f64 {
        if domain.wraps_longitude() {
            wrap_longitude(center_lon, self.dlon)
        } else {
            center_lon + self.dlon
        }
    }
}

/// Shift `lon` by `dlon` and fold the result back into [-180, 180).
///
/// The wrap applies once the shifted value would pass the antimeridian,
/// i.e. when `lon` is beyond `180 - |dlon|` on the side the offset points to.
/// A result of exactly 180 is reported as -180.
pub fn wrap_longitude(lon: f64, dlon: f64) -> f64 {
    let cutoff = 180.0 - dlon.abs();
    let shifted = if dlon < 0.0 && lon < -cutoff {
        lon + dlon + 360.0
    } else if dlon > 0.0 && lon > cutoff {
        lon + dlon - 360.0
    } else {
        lon + dlon
    };

    if shifted == 180.0 {
        -180.0
    } else {
        shifted
    }
}
