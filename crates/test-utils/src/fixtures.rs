//! Common test fixtures for weather type tests.
//!
//! This module provides pre-defined grids that represent the dataset
//! layouts the classifier is run on.

/// Common grid specifications for testing.
pub mod grid {
    use lwt_common::CoordAxis;

    /// ERA5-style European window (2.5 degree, latitudes north to south)
    pub const EUROPE: GridSpec = GridSpec {
        lat_start: 75.0,
        lat_step: -2.5,
        n_lat: 19,
        lon_start: -40.0,
        lon_step: 2.5,
        n_lon: 33,
    };

    /// Southern mid-latitudes over the Indian Ocean
    pub const SOUTHERN_OCEAN: GridSpec = GridSpec {
        lat_start: -30.0,
        lat_step: -2.5,
        n_lat: 17,
        lon_start: 60.0,
        lon_step: 2.5,
        n_lon: 33,
    };

    /// Global climate-model grid with 0..360 longitudes
    pub const GLOBAL_0_360: GridSpec = GridSpec {
        lat_start: -87.5,
        lat_step: 2.5,
        n_lat: 71,
        lon_start: 0.0,
        lon_step: 2.5,
        n_lon: 144,
    };

    /// A grid far coarser than the stencil
    pub const COARSE: GridSpec = GridSpec {
        lat_start: 30.0,
        lat_step: 10.0,
        n_lat: 5,
        lon_start: -30.0,
        lon_step: 10.0,
        n_lon: 7,
    };

    /// Regular grid specification.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub lat_start: f64,
        pub lat_step: f64,
        pub n_lat: usize,
        pub lon_start: f64,
        pub lon_step: f64,
        pub n_lon: usize,
    }

    impl GridSpec {
        /// Total number of grid points per time step.
        pub fn size(&self) -> usize {
            self.n_lat * self.n_lon
        }

        pub fn latitude(&self, name: &str) -> CoordAxis {
            crate::regular_axis(name, self.lat_start, self.lat_step, self.n_lat)
        }

        pub fn longitude(&self, name: &str) -> CoordAxis {
            crate::regular_axis(name, self.lon_start, self.lon_step, self.n_lon)
        }

        /// Last longitude of the grid.
        pub fn lon_end(&self) -> f64 {
            self.lon_start + self.lon_step * (self.n_lon - 1) as f64
        }
    }
}
