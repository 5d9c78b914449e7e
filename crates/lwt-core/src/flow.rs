//! Geostrophic flow and shear vorticity indices.
//!
//! Jones, P. D., Hulme, M., & Briffa, K. R. (1993). A comparison of Lamb
//! circulation types with an objective classification scheme. International
//! Journal of Climatology, 13(6), 655–663.

use ndarray::{Array4, Zip};
use serde::Serialize;

use lwt_common::{GridCoords, LwtError, Result};

use crate::constants::{ConstantFields, LatitudeConstants};
use crate::sampler::StencilSamples;
use crate::stencil::STENCIL_SIZE;

/// Flow and vorticity at a single center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellFlow {
    pub w: f64,
    pub s: f64,
    pub zw: f64,
    pub zs: f64,
}

impl CellFlow {
    /// Compute the indices from the 16 stencil values (`p[0]` is point 1).
    pub fn from_points(p: &[f64; STENCIL_SIZE], k: &LatitudeConstants) -> Self {
        let pt = |n: usize| p[n - 1];

        // Weighted column means 5 degrees either side of the center
        let east = 0.25 * (pt(5) + 2.0 * pt(9) + pt(13));
        let west = 0.25 * (pt(4) + 2.0 * pt(8) + pt(12));
        let centre_pair = 0.5 * (pt(8) + pt(9));

        let w = 0.5 * (pt(12) + pt(13)) - 0.5 * (pt(4) + pt(5));
        let s = k.scale * (east - west);
        let zw = k.zwa * (0.5 * (pt(15) + pt(16)) - centre_pair)
            - k.zwb * (centre_pair - 0.5 * (pt(1) + pt(2)));
        let zs = k.zsc
            * (0.25 * (pt(6) + 2.0 * pt(10) + pt(14)) - east - west
                + 0.25 * (pt(3) + 2.0 * pt(7) + pt(11)));

        Self { w, s, zw, zs }
    }

    /// Resultant flow `sqrt(S² + W²)`.
    pub fn f(&self) -> f64 {
        (self.s * self.s + self.w * self.w).sqrt()
    }

    /// Total shear vorticity `ZW + ZS`.
    pub fn z(&self) -> f64 {
        self.zw + self.zs
    }
}

/// The six derived fields, labeled like the classification centers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowIndices {
    pub coords: GridCoords,
    /// Westerly flow
    pub w: Array4<f64>,
    /// Southerly flow
    pub s: Array4<f64>,
    /// Resultant flow
    pub f: Array4<f64>,
    /// Westerly shear vorticity
    pub zw: Array4<f64>,
    /// Southerly shear vorticity
    pub zs: Array4<f64>,
    /// Total shear vorticity
    pub z: Array4<f64>,
}

impl FlowIndices {
    /// Combine stencil samples and constant fields into flow indices.
    pub fn compute(samples: &StencilSamples, constants: &ConstantFields) -> Result<Self> {
        let coords = samples.coords().clone();
        let (nt, nm, ny, nx) = coords.shape();

        if constants.shape() != (ny, nx) {
            return Err(LwtError::shape_mismatch(format!(
                "constant fields are {:?}, centers are ({}, {})",
                constants.shape(),
                ny,
                nx
            )));
        }
        for (k, sample) in samples.as_slice().iter().enumerate() {
            coords.check_shape(sample.shape(), &format!("stencil point {}", k + 1))?;
        }

        let dim = (nt, nm, ny, nx);
        let mut w = Array4::<f64>::zeros(dim);
        let mut s = Array4::<f64>::zeros(dim);
        let mut zw = Array4::<f64>::zeros(dim);
        let mut zs = Array4::<f64>::zeros(dim);

        Zip::indexed(&mut w)
            .and(&mut s)
            .and(&mut zw)
            .and(&mut zs)
            .par_for_each(|(t, m, i, j), w, s, zw, zs| {
                let cell = CellFlow::from_points(&samples.at(t, m, i, j), &constants.at(i, j));
                *w = cell.w;
                *s = cell.s;
                *zw = cell.zw;
                *zs = cell.zs;
            });

        let f = Zip::from(&s).and(&w).par_map_collect(|&s, &w| (s * s + w * w).sqrt());
        let z = &zw + &zs;

        Ok(Self {
            coords,
            w,
            s,
            f,
            zw,
            zs,
            z,
        })
    }

    /// Indices at one center.
    pub fn cell(&self, t: usize, m: usize, i: usize, j: usize) -> CellFlow {
        CellFlow {
            w: self.w[[t, m, i, j]],
            s: self.s[[t, m, i, j]],
            zw: self.zw[[t, m, i, j]],
            zs: self.zs[[t, m, i, j]],
        }
    }
}
