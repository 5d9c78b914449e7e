//! Flow bearing and compass octants.

use ndarray::{Array4, Zip};
use serde::Serialize;
use std::fmt;

use lwt_common::Hemisphere;

use crate::flow::FlowIndices;

/// Meteorological bearing of the flow, in degrees [0, 360).
///
/// The bearing is the direction the flow comes from:
/// - 180° = southerly (S > 0, W = 0)
/// - 270° = westerly (W > 0, S = 0)
pub fn flow_bearing(w: f64, s: f64) -> f64 {
    let bearing = (-w).atan2(-s).to_degrees().rem_euclid(360.0);
    // rem_euclid rounds tiny negative angles up to exactly 360
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Bearing of every cell of `flow`.
pub fn bearings(flow: &FlowIndices) -> Array4<f64> {
    Zip::from(&flow.w)
        .and(&flow.s)
        .par_map_collect(|&w, &s| flow_bearing(w, s))
}

/// One of the eight 45° compass sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Octant {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Bearing interval `(lower, upper]` of a northern hemisphere octant.
/// `lower_inclusive` closes the interval on the left.
#[derive(Debug, Clone, Copy)]
pub struct SectorRule {
    pub octant: Octant,
    pub lower: f64,
    pub upper: f64,
    pub lower_inclusive: bool,
}

impl SectorRule {
    const fn open(octant: Octant, lower: f64, upper: f64) -> Self {
        Self {
            octant,
            lower,
            upper,
            lower_inclusive: false,
        }
    }

    pub fn matches(&self, angle: f64) -> bool {
        let above = if self.lower_inclusive {
            angle >= self.lower
        } else {
            angle > self.lower
        };
        above && angle <= self.upper
    }
}

/// Northern hemisphere sectors in evaluation order. Later rules win.
pub const SECTOR_RULES: [SectorRule; 9] = [
    SectorRule::open(Octant::W, 247.0, 292.0),
    SectorRule::open(Octant::NW, 292.0, 337.0),
    SectorRule::open(Octant::N, 337.0, f64::INFINITY),
    SectorRule {
        octant: Octant::N,
        lower: 0.0,
        upper: 22.0,
        lower_inclusive: true,
    },
    SectorRule::open(Octant::NE, 22.0, 67.0),
    SectorRule::open(Octant::E, 67.0, 112.0),
    SectorRule::open(Octant::SE, 112.0, 157.0),
    SectorRule::open(Octant::S, 157.0, 202.0),
    SectorRule::open(Octant::SW, 202.0, 247.0),
];

impl Octant {
    pub const ALL: [Octant; 8] = [
        Octant::N,
        Octant::NE,
        Octant::E,
        Octant::SE,
        Octant::S,
        Octant::SW,
        Octant::W,
        Octant::NW,
    ];

    /// Octant of `angle` for the given hemisphere.
    ///
    /// The southern hemisphere uses the same intervals with every label
    /// replaced by its antipode. Angles matched by no rule (negative or NaN)
    /// have no octant.
    pub fn classify(angle: f64, hemisphere: Hemisphere) -> Option<Octant> {
        let north = SECTOR_RULES
            .iter()
            .filter(|rule| rule.matches(angle))
            .last()
            .map(|rule| rule.octant)?;

        Some(match hemisphere {
            Hemisphere::North => north,
            Hemisphere::South => north.opposite(),
        })
    }

    /// The antipodal compass label (N↔S, NE↔SW, E↔W, SE↔NW).
    pub fn opposite(self) -> Octant {
        match self {
            Octant::N => Octant::S,
            Octant::NE => Octant::SW,
            Octant::E => Octant::W,
            Octant::SE => Octant::NW,
            Octant::S => Octant::N,
            Octant::SW => Octant::NE,
            Octant::W => Octant::E,
            Octant::NW => Octant::SE,
        }
    }

    /// Last digit of the directional weather types (NE = 1 ... N = 8).
    pub fn type_digit(self) -> i8 {
        match self {
            Octant::NE => 1,
            Octant::E => 2,
            Octant::SE => 3,
            Octant::S => 4,
            Octant::SW => 5,
            Octant::W => 6,
            Octant::NW => 7,
            Octant::N => 8,
        }
    }

    /// Inverse of [`Octant::type_digit`].
    pub fn from_type_digit(digit: i8) -> Option<Octant> {
        Octant::ALL.into_iter().find(|o| o.type_digit() == digit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Octant::N => "N",
            Octant::NE => "NE",
            Octant::E => "E",
            Octant::SE => "SE",
            Octant::S => "S",
            Octant::SW => "SW",
            Octant::W => "W",
            Octant::NW => "NW",
        }
    }
}

impl fmt::Display for Octant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Octant of every cell of a bearing array.
pub fn classify_octants(bearing: &Array4<f64>, hemisphere: Hemisphere) -> Array4<Option<Octant>> {
    Zip::from(bearing).par_map_collect(|&angle| Octant::classify(angle, hemisphere))
}
