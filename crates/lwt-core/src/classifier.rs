//! End-to-end classification of a pressure field.

use ndarray::Array4;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use lwt_common::{ClassifierConfig, GridCoords, PressureField, Result};

use crate::constants::{CacheStats, ConstantFieldCache};
use crate::direction::{bearings, classify_octants, Octant};
use crate::flow::FlowIndices;
use crate::normalize::normalize_longitudes;
use crate::sampler::{Centers, GridpointSampler};
use crate::weather_type::{assign_weather_types, WeatherType};

/// Every product of one classification run, on the centers' coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub coords: GridCoords,
    pub flow: FlowIndices,
    /// Flow bearing in degrees
    pub bearing: Array4<f64>,
    pub octants: Array4<Option<Octant>>,
    pub weather_types: Array4<WeatherType>,
}

impl Classification {
    /// Weather type codes as plain integers.
    pub fn codes(&self) -> Array4<i8> {
        self.weather_types.mapv(WeatherType::code)
    }

    /// Number of cells that received a weather type.
    pub fn classified_count(&self) -> usize {
        self.weather_types.iter().filter(|t| t.is_classified()).count()
    }
}

/// Classifier for one dataset layout and hemisphere.
///
/// Holds a cache of the latitude constants so that repeated runs over the
/// same grid skip rebuilding them.
pub struct LwtClassifier {
    config: ClassifierConfig,
    sampler: GridpointSampler,
    cache: ConstantFieldCache,
}

impl LwtClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            sampler: GridpointSampler::new(config.convention()),
            cache: ConstantFieldCache::default(),
            config,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Classify every grid point of `field`.
    pub fn classify(&self, field: &PressureField) -> Result<Classification> {
        self.sampler.check_axes(field)?;
        let field = normalize_longitudes(field, self.sampler.geometry().longitude_name())?;
        let centers = Centers::from_field(&field);
        self.run(&field, &centers)
    }

    /// Classify the given centers only.
    ///
    /// Center longitudes above 180 are shifted into the (-180, 180]
    /// convention the field is normalized to, so a center may be given in
    /// either convention. The output is labeled with the shifted, ascending
    /// longitudes.
    pub fn classify_centers(
        &self,
        field: &PressureField,
        centers: &Centers,
    ) -> Result<Classification> {
        self.sampler.check_axes(field)?;
        let field = normalize_longitudes(field, self.sampler.geometry().longitude_name())?;
        let centers = centers.clone().normalize_longitudes()?;
        self.run(&field, &centers)
    }

    #[instrument(skip_all, fields(
        domain = %self.config.domain,
        source = %self.config.source,
        hemisphere = %self.config.hemisphere
    ))]
    fn run(&self, field: &PressureField, centers: &Centers) -> Result<Classification> {
        let constants = self
            .cache
            .get_or_build(centers.latitude().values(), centers.longitude().len());
        let non_finite = constants.non_finite_count();
        if non_finite > 0 {
            warn!(
                non_finite,
                "Latitude constants are not finite at some centers"
            );
        }

        let samples = self.sampler.sample(field, centers)?;
        let flow = FlowIndices::compute(&samples, &constants)?;
        let bearing = bearings(&flow);
        let octants = classify_octants(&bearing, self.config.hemisphere);
        let weather_types = assign_weather_types(&flow.f, &flow.z, &octants)?;

        let classification = Classification {
            coords: flow.coords.clone(),
            flow,
            bearing,
            octants,
            weather_types,
        };

        debug!(cache = ?self.cache.stats(), "Constant cache");
        info!(
            cells = classification.weather_types.len(),
            classified = classification.classified_count(),
            "Classified pressure field"
        );

        Ok(classification)
    }
}

impl Default for LwtClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
