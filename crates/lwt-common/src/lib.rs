//! Common types shared by the Lamb weather type crates.

pub mod axis;
pub mod config;
pub mod error;
pub mod field;

pub use axis::{AxisOrder, CoordAxis};
pub use config::{AxisConvention, ClassifierConfig, Domain, Hemisphere, Source};
pub use error::{LwtError, Result};
pub use field::{GridCoords, PressureField, MEMBER_DIM, TIME_DIM};
