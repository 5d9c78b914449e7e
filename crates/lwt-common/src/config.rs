//! Configuration for the weather type classifier.
//!
//! Only three options are recognized: the domain type, the data source
//! (which fixes the axis names) and the hemisphere. The weak-flow threshold
//! and the stencil geometry are constants of the method, not settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LwtError, Result};

/// Spatial extent of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Limited area; the stencil never reaches the domain edge, no wraparound.
    #[default]
    Regional,
    /// Whole globe; stencil longitudes wrap across the antimeridian.
    Global,
}

/// Origin of the dataset, which determines the axis naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Reanalysis products (ERA5, ERA-20C): `latitude` / `longitude`.
    #[default]
    Reanalysis,
    /// Climate model output (CMIP): `lat` / `lon`.
    Gcm,
}

/// Hemisphere of the classified region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

impl Source {
    pub fn latitude_name(&self) -> &'static str {
        match self {
            Source::Reanalysis => "latitude",
            Source::Gcm => "lat",
        }
    }

    pub fn longitude_name(&self) -> &'static str {
        match self {
            Source::Reanalysis => "longitude",
            Source::Gcm => "lon",
        }
    }
}

impl Domain {
    /// Whether stencil longitudes are wrapped across ±180°.
    pub fn wraps_longitude(&self) -> bool {
        matches!(self, Domain::Global)
    }
}

/// Axis naming and wraparound behaviour of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AxisConvention {
    pub domain: Domain,
    pub source: Source,
}

impl AxisConvention {
    pub fn new(domain: Domain, source: Source) -> Self {
        Self { domain, source }
    }

    pub fn latitude_name(&self) -> &'static str {
        self.source.latitude_name()
    }

    pub fn longitude_name(&self) -> &'static str {
        self.source.longitude_name()
    }

    pub fn wraps_longitude(&self) -> bool {
        self.domain.wraps_longitude()
    }
}

/// Configuration for a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Regional or global domain.
    #[serde(default)]
    pub domain: Domain,

    /// Reanalysis or climate model axis names.
    #[serde(default)]
    pub source: Source,

    /// Hemisphere used for the direction table.
    #[serde(default)]
    pub hemisphere: Hemisphere,
}

impl ClassifierConfig {
    pub fn new(domain: Domain, source: Source, hemisphere: Hemisphere) -> Self {
        Self {
            domain,
            source,
            hemisphere,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `LWT_DOMAIN`, `LWT_SOURCE` and `LWT_HEMISPHERE`; unset variables
    /// keep their defaults, unrecognized values are an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LWT_DOMAIN") {
            config.domain = val.parse()?;
        }

        if let Ok(val) = std::env::var("LWT_SOURCE") {
            config.source = val.parse()?;
        }

        if let Ok(val) = std::env::var("LWT_HEMISPHERE") {
            config.hemisphere = val.parse()?;
        }

        Ok(config)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Axis convention implied by domain and source.
    pub fn convention(&self) -> AxisConvention {
        AxisConvention::new(self.domain, self.source)
    }
}

impl FromStr for Domain {
    type Err = LwtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "regional" | "area" => Ok(Domain::Regional),
            "global" | "globe" => Ok(Domain::Global),
            other => Err(LwtError::invalid_config(format!(
                "unknown domain '{}', expected 'regional' or 'global'",
                other
            ))),
        }
    }
}

impl FromStr for Source {
    type Err = LwtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reanalysis" | "rean" => Ok(Source::Reanalysis),
            "gcm" | "model" => Ok(Source::Gcm),
            other => Err(LwtError::invalid_config(format!(
                "unknown source '{}', expected 'reanalysis' or 'gcm'",
                other
            ))),
        }
    }
}

impl FromStr for Hemisphere {
    type Err = LwtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "north" | "nh" => Ok(Hemisphere::North),
            "south" | "sh" => Ok(Hemisphere::South),
            other => Err(LwtError::invalid_config(format!(
                "unknown hemisphere '{}', expected 'north' or 'south'",
                other
            ))),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Regional => write!(f, "regional"),
            Domain::Global => write!(f, "global"),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Reanalysis => write!(f, "reanalysis"),
            Source::Gcm => write!(f, "gcm"),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hemisphere::North => write!(f, "north"),
            Hemisphere::South => write!(f, "south"),
        }
    }
}
