//! Labeled pressure fields and grid coordinates.
//!
//! Every field is stored as a 4-D array `(time, member, latitude, longitude)`.
//! Datasets without an ensemble dimension carry a member axis of length one
//! and `members == None`; only the reported dimension names differ.

use chrono::{DateTime, Utc};
use ndarray::{Array3, Array4, Axis};
use serde::{Deserialize, Serialize};

use crate::axis::CoordAxis;
use crate::error::{LwtError, Result};

/// Dimension name used for the time axis.
pub const TIME_DIM: &str = "time";

/// Dimension name used for the ensemble-member axis.
pub const MEMBER_DIM: &str = "number";

/// Coordinate labels shared by a pressure field and every product derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCoords {
    pub times: Vec<DateTime<Utc>>,
    pub members: Option<Vec<i64>>,
    pub latitude: CoordAxis,
    pub longitude: CoordAxis,
}

impl GridCoords {
    pub fn new(
        times: Vec<DateTime<Utc>>,
        members: Option<Vec<i64>>,
        latitude: CoordAxis,
        longitude: CoordAxis,
    ) -> Self {
        Self {
            times,
            members,
            latitude,
            longitude,
        }
    }

    /// Number of ensemble members, 1 when the dataset has no member dimension.
    pub fn member_count(&self) -> usize {
        self.members.as_ref().map_or(1, Vec::len)
    }

    /// Storage shape `(time, member, latitude, longitude)`.
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (
            self.times.len(),
            self.member_count(),
            self.latitude.len(),
            self.longitude.len(),
        )
    }

    /// Dimension names as a consumer sees them; the member dimension only
    /// appears when the dataset has one.
    pub fn dims(&self) -> Vec<&str> {
        let mut dims = vec![TIME_DIM];
        if self.members.is_some() {
            dims.push(MEMBER_DIM);
        }
        dims.push(self.latitude.name());
        dims.push(self.longitude.name());
        dims
    }

    /// Same times and members on different horizontal axes.
    pub fn with_axes(&self, latitude: CoordAxis, longitude: CoordAxis) -> Self {
        Self {
            times: self.times.clone(),
            members: self.members.clone(),
            latitude,
            longitude,
        }
    }

    /// Check that `shape` matches these labels.
    pub fn check_shape(&self, shape: &[usize], what: &str) -> Result<()> {
        let (nt, nm, ny, nx) = self.shape();
        if shape != [nt, nm, ny, nx] {
            return Err(LwtError::shape_mismatch(format!(
                "{} has shape {:?}, coordinates describe [{}, {}, {}, {}]",
                what, shape, nt, nm, ny, nx
            )));
        }
        Ok(())
    }
}

/// A gridded mean-sea-level pressure field with its coordinate labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureField {
    data: Array4<f64>,
    coords: GridCoords,
}

impl PressureField {
    /// Create a field, checking that the array shape matches the labels.
    pub fn new(data: Array4<f64>, coords: GridCoords) -> Result<Self> {
        coords.check_shape(data.shape(), "pressure data")?;
        if let Some(members) = &coords.members {
            if members.is_empty() {
                return Err(LwtError::shape_mismatch("ensemble member list is empty"));
            }
        }
        Ok(Self { data, coords })
    }

    /// Field without an ensemble dimension, data laid out `(time, latitude, longitude)`.
    pub fn from_3d(
        data: Array3<f64>,
        times: Vec<DateTime<Utc>>,
        latitude: CoordAxis,
        longitude: CoordAxis,
    ) -> Result<Self> {
        let data = data.insert_axis(Axis(1));
        Self::new(data, GridCoords::new(times, None, latitude, longitude))
    }

    /// Field with an ensemble dimension, data laid out `(time, member, latitude, longitude)`.
    pub fn from_4d(
        data: Array4<f64>,
        times: Vec<DateTime<Utc>>,
        members: Vec<i64>,
        latitude: CoordAxis,
        longitude: CoordAxis,
    ) -> Result<Self> {
        Self::new(data, GridCoords::new(times, Some(members), latitude, longitude))
    }

    pub fn data(&self) -> &Array4<f64> {
        &self.data
    }

    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    pub fn latitude(&self) -> &CoordAxis {
        &self.coords.latitude
    }

    pub fn longitude(&self) -> &CoordAxis {
        &self.coords.longitude
    }

    pub fn has_members(&self) -> bool {
        self.coords.members.is_some()
    }

    /// Split into the raw array and its labels.
    pub fn into_parts(self) -> (Array4<f64>, GridCoords) {
        (self.data, self.coords)
    }
}
