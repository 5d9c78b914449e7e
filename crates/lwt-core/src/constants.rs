//! Latitude-dependent constants of the Jenkinson-Collison indices.
//!
//! The constants correct for the convergence of meridians: the stencil is
//! laid out in degrees, so the east-west spacing shrinks with latitude.
//! Nothing here guards against the poles or the `φ ∓ 5°` singularities;
//! such latitudes produce non-finite values that propagate downstream.

use lru::LruCache;
use ndarray::Array2;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// The four constants for a single latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatitudeConstants {
    /// `1 / cos φ`
    pub scale: f64,
    /// `sin φ / sin(φ - 5°)`
    pub zwa: f64,
    /// `sin φ / sin(φ + 5°)`
    pub zwb: f64,
    /// `1 / (2 cos² φ)`
    pub zsc: f64,
}

impl LatitudeConstants {
    pub fn for_latitude(lat_deg: f64) -> Self {
        let phi = lat_deg.to_radians();
        let cos_phi = phi.cos();
        Self {
            scale: 1.0 / cos_phi,
            zwa: phi.sin() / (lat_deg - 5.0).to_radians().sin(),
            zwb: phi.sin() / (lat_deg + 5.0).to_radians().sin(),
            zsc: 1.0 / (2.0 * cos_phi * cos_phi),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.scale.is_finite()
            && self.zwa.is_finite()
            && self.zwb.is_finite()
            && self.zsc.is_finite()
    }
}

/// Constant fields over the classification centers, `(latitude, longitude)`.
///
/// Every row holds the constants of its latitude, repeated across all
/// longitude columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantFields {
    pub scale: Array2<f64>,
    pub zwa: Array2<f64>,
    pub zwb: Array2<f64>,
    pub zsc: Array2<f64>,
}

impl ConstantFields {
    /// Build the four fields for `latitudes` broadcast over `n_lon` columns.
    pub fn build(latitudes: &[f64], n_lon: usize) -> Self {
        let rows: Vec<LatitudeConstants> = latitudes
            .iter()
            .map(|&lat| LatitudeConstants::for_latitude(lat))
            .collect();
        let shape = (rows.len(), n_lon);

        Self {
            scale: Array2::from_shape_fn(shape, |(i, _)| rows[i].scale),
            zwa: Array2::from_shape_fn(shape, |(i, _)| rows[i].zwa),
            zwb: Array2::from_shape_fn(shape, |(i, _)| rows[i].zwb),
            zsc: Array2::from_shape_fn(shape, |(i, _)| rows[i].zsc),
        }
    }

    /// `(n_lat, n_lon)`
    pub fn shape(&self) -> (usize, usize) {
        self.scale.dim()
    }

    /// Constants at one center.
    pub fn at(&self, i: usize, j: usize) -> LatitudeConstants {
        LatitudeConstants {
            scale: self.scale[[i, j]],
            zwa: self.zwa[[i, j]],
            zwb: self.zwb[[i, j]],
            zsc: self.zsc[[i, j]],
        }
    }

    /// Number of centers with at least one non-finite constant.
    pub fn non_finite_count(&self) -> usize {
        let (ny, nx) = self.shape();
        (0..ny)
            .flat_map(|i| (0..nx).map(move |j| (i, j)))
            .filter(|&(i, j)| !self.at(i, j).is_finite())
            .count()
    }
}

/// Cache key: latitude bit patterns plus longitude count.
pub type ConstantKey = (Vec<u64>, usize);

/// Statistics about the constant-field cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of constant fields keyed by the exact latitude axis.
///
/// Entries are immutable and shared, so a hit returns the same fields a
/// fresh build would produce.
pub struct ConstantFieldCache {
    cache: Mutex<LruCache<ConstantKey, Arc<ConstantFields>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ConstantFieldCache {
    /// Default number of distinct grids remembered.
    pub const DEFAULT_CAPACITY: usize = 8;

    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return cached fields for this grid, building them on a miss.
    pub fn get_or_build(&self, latitudes: &[f64], n_lon: usize) -> Arc<ConstantFields> {
        let key: ConstantKey = (latitudes.iter().map(|v| v.to_bits()).collect(), n_lon);

        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(fields) = cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(fields);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let fields = Arc::new(ConstantFields::build(latitudes, n_lon));
        cache.put(key, Arc::clone(&fields));
        fields
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self
            .cache
            .lock()
            .map(|c| c.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len());
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }

    pub fn clear(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.clear();
    }
}

impl Default for ConstantFieldCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
