//! Lamb weather types from gridded mean-sea-level pressure
//!
//! This crate implements the objective Jenkinson-Collison scheme for Lamb
//! weather types. Every grid point of a pressure field is classified from
//! 16 pressure values sampled on a fixed stencil around it:
//!
//! - **Any dataset layout**: regional or global domains, reanalysis or
//!   climate-model axis names, with or without ensemble members
//! - **Whole-array evaluation**: every stage works on `(time, member,
//!   lat, lon)` arrays and runs in parallel with rayon
//! - **Cached geometry**: latitude constants are built once per grid
//!
//! # Architecture
//!
//! ```text
//! PressureField + ClassifierConfig
//!      │
//!      ▼
//! LwtClassifier::classify(field)
//!      │
//!      ├─► normalize_longitudes (0..360 → (-180, 180])
//!      │
//!      ├─► ConstantFieldCache::get_or_build(center latitudes)
//!      │
//!      ├─► GridpointSampler::sample → 16 StencilSamples
//!      │
//!      ├─► FlowIndices::compute → W, S, F, ZW, ZS, Z
//!      │
//!      ├─► bearings + classify_octants (hemisphere aware)
//!      │
//!      └─► assign_weather_types
//!               │
//!               ▼
//!          Classification
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lwt_common::ClassifierConfig;
//! use lwt_core::LwtClassifier;
//!
//! let classifier = LwtClassifier::new(ClassifierConfig::from_env()?);
//! let result = classifier.classify(&field)?;
//!
//! for code in result.codes().iter() {
//!     // ...
//! }
//! ```

pub mod classifier;
pub mod constants;
pub mod direction;
pub mod flow;
pub mod normalize;
pub mod sampler;
pub mod stencil;
pub mod weather_type;

// Re-export commonly used types at crate root
pub use classifier::{Classification, LwtClassifier};
pub use constants::{CacheStats, ConstantFieldCache, ConstantFields, LatitudeConstants};
pub use direction::{bearings, classify_octants, flow_bearing, Octant, SECTOR_RULES};
pub use flow::{CellFlow, FlowIndices};
pub use normalize::{normalize_longitude_axis, normalize_longitudes};
pub use sampler::{Centers, GridpointSampler, SamplingGeometry, StencilSamples};
pub use stencil::{wrap_longitude, StencilOffset, STENCIL, STENCIL_SIZE};
pub use weather_type::{
    assign_weather_type, assign_weather_types, matched_rules, WeatherType, WeatherTypeKind,
    ASSIGNMENT_RULES, WEAK_FLOW_THRESHOLD,
};
