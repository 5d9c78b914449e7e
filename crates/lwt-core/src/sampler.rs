//! Extraction of the 16 stencil points around every classification center.
//!
//! One sampler serves all four dataset layouts. The layout only decides
//! which axis names are expected and whether stencil longitudes wrap across
//! the antimeridian; the lookup itself is always a nearest-neighbor
//! selection on each axis independently.

use ndarray::{Array4, Axis};
use rayon::prelude::*;
use tracing::{debug, warn};

use lwt_common::{AxisConvention, CoordAxis, GridCoords, LwtError, PressureField, Result};

use crate::normalize::normalize_longitude_axis;
use crate::stencil::{StencilOffset, STENCIL, STENCIL_SIZE};

/// Widest grid spacing (degrees) at which distinct stencil points still
/// resolve to distinct grid points.
const STENCIL_RESOLUTION: f64 = 5.0;

/// The capabilities a sampler needs from a dataset layout.
pub trait SamplingGeometry: Sync {
    /// Name the latitude axis must carry.
    fn latitude_name(&self) -> &str;

    /// Name the longitude axis must carry.
    fn longitude_name(&self) -> &str;

    /// Longitude to look up for `offset` around `center_lon`.
    fn target_longitude(&self, offset: &StencilOffset, center_lon: f64) -> f64;
}

impl SamplingGeometry for AxisConvention {
    fn latitude_name(&self) -> &str {
        AxisConvention::latitude_name(self)
    }

    fn longitude_name(&self) -> &str {
        AxisConvention::longitude_name(self)
    }

    fn target_longitude(&self, offset: &StencilOffset, center_lon: f64) -> f64 {
        offset.longitude(center_lon, self.domain)
    }
}

/// Center coordinates at which weather types are computed.
#[derive(Debug, Clone, PartialEq)]
pub struct Centers {
    latitude: CoordAxis,
    longitude: CoordAxis,
}

impl Centers {
    pub fn new(latitude: CoordAxis, longitude: CoordAxis) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Every grid point of the field.
    pub fn from_field(field: &PressureField) -> Self {
        Self::new(field.latitude().clone(), field.longitude().clone())
    }

    pub fn latitude(&self) -> &CoordAxis {
        &self.latitude
    }

    pub fn longitude(&self) -> &CoordAxis {
        &self.longitude
    }

    /// Keep only center latitudes inside `[min, max]`.
    ///
    /// Useful to drop latitudes where the constant fields degenerate.
    pub fn restrict_latitudes(self, min: f64, max: f64) -> Result<Self> {
        let latitude = restrict(&self.latitude, min, max)?;
        Ok(Self { latitude, ..self })
    }

    /// Shift center longitudes above 180 into the (-180, 180] convention
    /// of a normalized field, re-sorting them ascending.
    pub fn normalize_longitudes(self) -> Result<Self> {
        match normalize_longitude_axis(&self.longitude)? {
            Some((longitude, _)) => Ok(Self { longitude, ..self }),
            None => Ok(self),
        }
    }

    /// Keep only center longitudes inside `[min, max]`.
    pub fn restrict_longitudes(self, min: f64, max: f64) -> Result<Self> {
        let longitude = restrict(&self.longitude, min, max)?;
        Ok(Self { longitude, ..self })
    }

    /// Number of centers per time step and member.
    pub fn len(&self) -> usize {
        self.latitude.len() * self.longitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn restrict(axis: &CoordAxis, min: f64, max: f64) -> Result<CoordAxis> {
    let keep: Vec<usize> = axis
        .values()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v >= min && v <= max)
        .map(|(i, _)| i)
        .collect();

    if keep.is_empty() {
        return Err(LwtError::EmptySelection(format!(
            "no '{}' values in [{}, {}]",
            axis.name(),
            min,
            max
        )));
    }
    axis.select(&keep)
}

/// The 16 sampled pressure arrays, each shaped `(time, member, center_lat, center_lon)`.
#[derive(Debug, Clone)]
pub struct StencilSamples {
    samples: Vec<Array4<f64>>,
    coords: GridCoords,
}

impl StencilSamples {
    /// Samples of stencil point `n`, numbered from 1 like the stencil diagram.
    ///
    /// # Panics
    /// Panics if `n` is not in `1..=16`.
    pub fn point(&self, n: usize) -> &Array4<f64> {
        &self.samples[n - 1]
    }

    /// All sample arrays in point order.
    pub fn as_slice(&self) -> &[Array4<f64>] {
        &self.samples
    }

    /// Labels of the centers the samples belong to.
    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// Values of all 16 points at one center.
    pub fn at(&self, t: usize, m: usize, i: usize, j: usize) -> [f64; STENCIL_SIZE] {
        std::array::from_fn(|k| self.samples[k][[t, m, i, j]])
    }
}

/// Nearest-neighbor stencil sampler for one dataset layout.
#[derive(Debug, Clone, Copy)]
pub struct GridpointSampler<G = AxisConvention> {
    geometry: G,
}

impl<G: SamplingGeometry> GridpointSampler<G> {
    pub fn new(geometry: G) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Check that the field's axes carry this layout's names.
    pub fn check_axes(&self, field: &PressureField) -> Result<()> {
        self.check_names(field.latitude(), field.longitude())
    }

    fn check_names(&self, latitude: &CoordAxis, longitude: &CoordAxis) -> Result<()> {
        let lat_name = self.geometry.latitude_name();
        if latitude.name() != lat_name {
            return Err(LwtError::axis_not_found(lat_name, latitude.name()));
        }
        let lon_name = self.geometry.longitude_name();
        if longitude.name() != lon_name {
            return Err(LwtError::axis_not_found(lon_name, longitude.name()));
        }
        Ok(())
    }

    /// Sample the stencil around every center.
    ///
    /// Each offset resolves its target latitudes and longitudes to the
    /// nearest grid values independently, then selects the full
    /// `(time, member)` block at those rows and columns. Targets outside the
    /// grid resolve to the edge value. Center axes must carry the same names
    /// as the field's.
    pub fn sample(&self, field: &PressureField, centers: &Centers) -> Result<StencilSamples> {
        self.check_axes(field)?;
        self.check_names(&centers.latitude, &centers.longitude)?;

        let lat_axis = field.latitude();
        let lon_axis = field.longitude();

        let coarse = [lat_axis.min_spacing(), lon_axis.min_spacing()]
            .into_iter()
            .flatten()
            .any(|d| d > STENCIL_RESOLUTION);
        if coarse {
            warn!(
                lat_spacing = ?lat_axis.min_spacing(),
                lon_spacing = ?lon_axis.min_spacing(),
                "Grid is coarser than the stencil; neighbouring points may share grid values"
            );
        }

        let samples: Vec<Array4<f64>> = STENCIL
            .par_iter()
            .map(|offset| {
                let lat_targets: Vec<f64> = centers
                    .latitude
                    .values()
                    .iter()
                    .map(|&lat| offset.latitude(lat))
                    .collect();
                let lon_targets: Vec<f64> = centers
                    .longitude
                    .values()
                    .iter()
                    .map(|&lon| self.geometry.target_longitude(offset, lon))
                    .collect();

                let rows = lat_axis.nearest_indices(&lat_targets);
                let cols = lon_axis.nearest_indices(&lon_targets);

                field.data().select(Axis(2), &rows).select(Axis(3), &cols)
            })
            .collect();

        let coords = field
            .coords()
            .with_axes(centers.latitude.clone(), centers.longitude.clone());

        debug!(
            centers_lat = centers.latitude.len(),
            centers_lon = centers.longitude.len(),
            times = coords.times.len(),
            members = coords.member_count(),
            "Sampled stencil"
        );

        Ok(StencilSamples { samples, coords })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lwt_common::{Domain, Source};
    use test_utils::fixtures::grid::COARSE;
    use test_utils::{coordinate_encoded_field, regular_axis};

    /// Value `coordinate_encoded_field` stores at `(lat, lon)`.
    fn encode(lat: f64, lon: f64) -> f64 {
        lat * 1000.0 + lon
    }

    fn coordinate_field(lat: CoordAxis, lon: CoordAxis) -> PressureField {
        coordinate_encoded_field(lat, lon, 2)
    }

    fn era5_sampler() -> GridpointSampler {
        GridpointSampler::new(AxisConvention::new(Domain::Regional, Source::Reanalysis))
    }

    #[test]
    fn test_regional_samples_follow_offsets() {
        let field = coordinate_field(
            regular_axis("latitude", 30.0, 2.5, 17),
            regular_axis("longitude", -30.0, 2.5, 25),
        );
        let centers = Centers::from_field(&field)
            .restrict_latitudes(40.0, 60.0)
            .unwrap()
            .restrict_longitudes(-10.0, 10.0)
            .unwrap();
        let samples = era5_sampler().sample(&field, &centers).unwrap();

        assert_eq!(samples.point(1).shape(), &[2, 1, 9, 9]);
        for (k, offset) in STENCIL.iter().enumerate() {
            for (i, &clat) in centers.latitude().values().iter().enumerate() {
                for (j, &clon) in centers.longitude().values().iter().enumerate() {
                    assert_eq!(
                        samples.point(k + 1)[[0, 0, i, j]],
                        encode(clat + offset.dlat, clon + offset.dlon)
                    );
                }
            }
        }
        // Every time step is sampled
        assert_eq!(samples.point(9)[[1, 0, 0, 0]], encode(40.0, -5.0));
        assert_eq!(samples.coords().latitude.first(), 40.0);
    }

    #[test]
    fn test_global_samples_wrap_antimeridian() {
        let field = coordinate_field(
            regular_axis("lat", 30.0, 5.0, 9),
            regular_axis("lon", -180.0, 5.0, 72),
        );
        let centers = Centers::from_field(&field)
            .restrict_latitudes(50.0, 50.0)
            .unwrap()
            .restrict_longitudes(175.0, 175.0)
            .unwrap();
        let sampler = GridpointSampler::new(AxisConvention::new(Domain::Global, Source::Gcm));
        let samples = sampler.sample(&field, &centers).unwrap();

        // 175 + 5 -> 180 -> -180
        assert_eq!(samples.point(9)[[0, 0, 0, 0]], encode(50.0, -180.0));
        // 175 + 15 -> -170
        assert_eq!(samples.point(10)[[0, 0, 0, 0]], encode(50.0, -170.0));
        // 175 - 15 -> 160, no wrap
        assert_eq!(samples.point(7)[[0, 0, 0, 0]], encode(50.0, 160.0));
    }

    #[test]
    fn test_regional_targets_clamp_to_edge() {
        let field = coordinate_field(
            regular_axis("lat", 30.0, 5.0, 9),
            regular_axis("lon", -180.0, 5.0, 72),
        );
        let centers = Centers::from_field(&field)
            .restrict_longitudes(175.0, 175.0)
            .unwrap();
        let sampler = GridpointSampler::new(AxisConvention::new(Domain::Regional, Source::Gcm));
        let samples = sampler.sample(&field, &centers).unwrap();

        // 175 + 15 = 190 has no wrap and snaps to the last column
        assert_eq!(samples.point(10)[[0, 0, 0, 0]], encode(30.0, 175.0));
        // 30 - 10 = 20 is below the grid and snaps to the first row
        assert_eq!(samples.point(15)[[0, 0, 0, 0]], encode(30.0, 170.0));
    }

    #[test]
    fn test_descending_latitude_axis() {
        let field = coordinate_field(
            regular_axis("latitude", 70.0, -2.5, 17),
            regular_axis("longitude", -30.0, 2.5, 25),
        );
        let centers = Centers::from_field(&field)
            .restrict_latitudes(50.0, 50.0)
            .unwrap()
            .restrict_longitudes(0.0, 0.0)
            .unwrap();
        let samples = era5_sampler().sample(&field, &centers).unwrap();

        assert_eq!(samples.point(1)[[0, 0, 0, 0]], encode(60.0, -5.0));
        assert_eq!(samples.point(16)[[0, 0, 0, 0]], encode(40.0, 5.0));
        assert_eq!(samples.at(0, 0, 0, 0)[5], encode(55.0, 15.0));
    }

    #[test]
    fn test_repeated_sampling_is_bit_identical() {
        // 2 degree grid: offsets of 5 and 15 fall exactly between grid values
        let field = coordinate_field(
            regular_axis("latitude", 20.0, 2.0, 31),
            regular_axis("longitude", -40.0, 2.0, 41),
        );
        let centers = Centers::from_field(&field)
            .restrict_latitudes(35.0, 65.0)
            .unwrap()
            .restrict_longitudes(-20.0, 20.0)
            .unwrap();
        let sampler = GridpointSampler::new(AxisConvention::default());

        let first = sampler.sample(&field, &centers).unwrap();
        for _ in 0..5 {
            let again = sampler.sample(&field, &centers).unwrap();
            for (a, b) in first.as_slice().iter().zip(again.as_slice()) {
                assert!(a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits()));
            }
        }
        // Ties resolve to the larger coordinate: (36 - 5, -20 - 5) -> (32, -24)
        assert_eq!(first.point(12)[[0, 0, 0, 0]], encode(32.0, -24.0));
    }

    #[test]
    fn test_wrong_axis_names_rejected() {
        let field = coordinate_field(
            regular_axis("latitude", 30.0, 5.0, 5),
            regular_axis("longitude", 0.0, 5.0, 5),
        );
        let sampler = GridpointSampler::new(AxisConvention::new(Domain::Regional, Source::Gcm));
        let err = sampler.sample(&field, &Centers::from_field(&field)).unwrap_err();
        assert!(matches!(err, LwtError::AxisNotFound { .. }));
    }

    #[test]
    fn test_empty_center_selection() {
        let field = coordinate_field(
            regular_axis("latitude", 30.0, 5.0, 5),
            regular_axis("longitude", 0.0, 5.0, 5),
        );
        let err = Centers::from_field(&field)
            .restrict_latitudes(80.0, 85.0)
            .unwrap_err();
        assert!(matches!(err, LwtError::EmptySelection(_)));
    }

    #[test]
    fn test_center_axis_names_must_match_the_field() {
        let field = coordinate_field(
            regular_axis("latitude", 30.0, 5.0, 5),
            regular_axis("longitude", 0.0, 5.0, 5),
        );
        let centers = Centers::new(
            regular_axis("lat", 40.0, 5.0, 1),
            regular_axis("longitude", 10.0, 5.0, 1),
        );
        let err = era5_sampler().sample(&field, &centers).unwrap_err();
        assert!(matches!(err, LwtError::AxisNotFound { .. }));
    }

    #[test]
    fn test_coarse_grid_shares_neighbouring_points() {
        let field = coordinate_encoded_field(
            COARSE.latitude("latitude"),
            COARSE.longitude("longitude"),
            1,
        );
        let samples = era5_sampler()
            .sample(&field, &Centers::from_field(&field))
            .unwrap();
        assert_eq!(samples.point(1).shape(), &[1, 1, 5, 7]);

        // Around (50, 0): (60, -5) and (55, -5) both snap to (60, 0)
        let (i, j) = (2, 3);
        assert_eq!(samples.point(1)[[0, 0, i, j]], encode(60.0, 0.0));
        assert_eq!(samples.point(4)[[0, 0, i, j]], encode(60.0, 0.0));
    }

    #[test]
    fn test_center_longitudes_follow_the_normalized_field() {
        let centers = Centers::new(
            regular_axis("lat", 50.0, 1.0, 1),
            regular_axis("lon", 170.0, 10.0, 4),
        )
        .normalize_longitudes()
        .unwrap();
        assert_eq!(centers.longitude().values(), &[-170.0, -160.0, 170.0, 180.0]);

        // -160 and 200 are the same meridian
        let err = Centers::new(
            regular_axis("lat", 50.0, 1.0, 1),
            CoordAxis::new("lon", vec![-160.0, 200.0]).unwrap(),
        )
        .normalize_longitudes()
        .unwrap_err();
        assert!(matches!(err, LwtError::MalformedAxis { .. }));
    }
}
