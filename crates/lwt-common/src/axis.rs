//! Named coordinate axes for regular latitude/longitude grids.

use crate::error::{LwtError, Result};
use serde::{Deserialize, Serialize};

/// Direction in which the values of an axis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrder {
    Ascending,
    Descending,
}

/// A named, strictly monotonic coordinate axis.
///
/// Construction rejects empty axes, non-finite values, duplicates and
/// direction changes, so nearest-neighbor lookup is always well defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisRepr", into = "AxisRepr")]
pub struct CoordAxis {
    name: String,
    values: Vec<f64>,
    order: AxisOrder,
}

#[derive(Serialize, Deserialize)]
struct AxisRepr {
    name: String,
    values: Vec<f64>,
}

impl TryFrom<AxisRepr> for CoordAxis {
    type Error = LwtError;

    fn try_from(repr: AxisRepr) -> Result<Self> {
        CoordAxis::new(repr.name, repr.values)
    }
}

impl From<CoordAxis> for AxisRepr {
    fn from(axis: CoordAxis) -> Self {
        AxisRepr {
            name: axis.name,
            values: axis.values,
        }
    }
}

impl CoordAxis {
    /// Create a validated axis.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();

        if values.is_empty() {
            return Err(LwtError::malformed_axis(name, "axis has no values"));
        }

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(LwtError::malformed_axis(
                name,
                format!("non-finite value at index {}", pos),
            ));
        }

        let order = if values.len() < 2 || values[1] > values[0] {
            AxisOrder::Ascending
        } else {
            AxisOrder::Descending
        };

        for (i, pair) in values.windows(2).enumerate() {
            let ok = match order {
                AxisOrder::Ascending => pair[1] > pair[0],
                AxisOrder::Descending => pair[1] < pair[0],
            };
            if !ok {
                let message = if pair[1] == pair[0] {
                    format!("duplicate value {} at index {}", pair[1], i + 1)
                } else {
                    format!("not strictly monotonic at index {}", i + 1)
                };
                return Err(LwtError::malformed_axis(name, message));
            }
        }

        Ok(Self {
            name,
            values,
            order,
        })
    }

    /// Evenly spaced axis: `start, start + step, ...` with `count` values.
    pub fn regular(name: impl Into<String>, start: f64, step: f64, count: usize) -> Result<Self> {
        let values = (0..count).map(|i| start + i as f64 * step).collect();
        Self::new(name, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn order(&self) -> AxisOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a validated axis; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.values[0]
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Same values under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: self.values.clone(),
            order: self.order,
        }
    }

    /// Smallest distance between adjacent values, `None` for a single-value axis.
    pub fn min_spacing(&self) -> Option<f64> {
        self.values
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Index of the value closest to `target`.
    ///
    /// Targets beyond either end resolve to the end value. When `target` is
    /// exactly halfway between two values the larger coordinate wins, for
    /// both ascending and descending axes. A NaN target resolves to index 0.
    pub fn nearest_index(&self, target: f64) -> usize {
        let n = self.values.len();
        if n == 1 || target.is_nan() {
            return 0;
        }

        match self.order {
            AxisOrder::Ascending => {
                let pos = self.values.partition_point(|&v| v < target);
                if pos == 0 {
                    return 0;
                }
                if pos == n {
                    return n - 1;
                }
                let below = target - self.values[pos - 1];
                let above = self.values[pos] - target;
                if below < above {
                    pos - 1
                } else {
                    pos
                }
            }
            AxisOrder::Descending => {
                let pos = self.values.partition_point(|&v| v > target);
                if pos == 0 {
                    return 0;
                }
                if pos == n {
                    return n - 1;
                }
                let above = self.values[pos - 1] - target;
                let below = target - self.values[pos];
                if above <= below {
                    pos - 1
                } else {
                    pos
                }
            }
        }
    }

    /// Nearest index for every target, in order.
    pub fn nearest_indices(&self, targets: &[f64]) -> Vec<usize> {
        targets.iter().map(|&t| self.nearest_index(t)).collect()
    }

    /// Axis made of the values at `indices`, re-validated.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let mut values = Vec::with_capacity(indices.len());
        for &i in indices {
            let v = self.values.get(i).copied().ok_or_else(|| {
                LwtError::shape_mismatch(format!(
                    "index {} out of range for axis '{}' of length {}",
                    i,
                    self.name,
                    self.values.len()
                ))
            })?;
            values.push(v);
        }
        Self::new(self.name.clone(), values)
    }
}
