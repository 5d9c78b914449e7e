//! Lamb weather type assignment.
//!
//! Each cell is classified from its resultant flow `F`, total shear
//! vorticity `Z` and flow octant by an ordered list of rules. Every rule
//! that matches overwrites the result of the rules before it, so the order
//! of [`ASSIGNMENT_RULES`] is part of the definition.
//!
//! Codes:
//!
//! | Code   | Family                         |
//! |--------|--------------------------------|
//! | -1     | unclassified (weak flow)       |
//! | 0      | anticyclonic                   |
//! | 1..8   | anticyclonic hybrid, by octant |
//! | 11..18 | directional, by octant         |
//! | 20     | cyclonic                       |
//! | 21..28 | cyclonic hybrid, by octant     |
//!
//! Octant digits run NE = 1, E = 2, SE = 3, S = 4, SW = 5, W = 6, NW = 7,
//! N = 8.

use ndarray::{Array4, Zip};
use serde::Serialize;
use std::fmt;

use lwt_common::{LwtError, Result};

use crate::direction::Octant;

/// Flow and vorticity below this magnitude leave a cell unclassified.
pub const WEAK_FLOW_THRESHOLD: f64 = 6.0;

/// An integer weather type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WeatherType(i8);

/// Decoded form of a [`WeatherType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherTypeKind {
    Unclassified,
    Anticyclonic,
    AnticyclonicHybrid(Octant),
    Directional(Octant),
    Cyclonic,
    CyclonicHybrid(Octant),
}

impl WeatherType {
    pub const UNCLASSIFIED: WeatherType = WeatherType(-1);
    pub const ANTICYCLONIC: WeatherType = WeatherType(0);
    pub const CYCLONIC: WeatherType = WeatherType(20);

    const ANTICYCLONIC_HYBRID_BASE: i8 = 0;
    const DIRECTIONAL_BASE: i8 = 10;
    const CYCLONIC_HYBRID_BASE: i8 = 20;

    /// Validate a raw code.
    pub fn from_code(code: i8) -> Option<WeatherType> {
        let valid = matches!(code, -1 | 0 | 1..=8 | 11..=18 | 20 | 21..=28);
        valid.then_some(WeatherType(code))
    }

    pub fn anticyclonic_hybrid(octant: Octant) -> WeatherType {
        WeatherType(Self::ANTICYCLONIC_HYBRID_BASE + octant.type_digit())
    }

    pub fn directional(octant: Octant) -> WeatherType {
        WeatherType(Self::DIRECTIONAL_BASE + octant.type_digit())
    }

    pub fn cyclonic_hybrid(octant: Octant) -> WeatherType {
        WeatherType(Self::CYCLONIC_HYBRID_BASE + octant.type_digit())
    }

    pub fn code(self) -> i8 {
        self.0
    }

    pub fn is_classified(self) -> bool {
        self != Self::UNCLASSIFIED
    }

    pub fn kind(self) -> WeatherTypeKind {
        let octant = |digit: i8| Octant::from_type_digit(digit);
        match self.0 {
            0 => WeatherTypeKind::Anticyclonic,
            20 => WeatherTypeKind::Cyclonic,
            c @ 1..=8 => octant(c)
                .map(WeatherTypeKind::AnticyclonicHybrid)
                .unwrap_or(WeatherTypeKind::Unclassified),
            c @ 11..=18 => octant(c - Self::DIRECTIONAL_BASE)
                .map(WeatherTypeKind::Directional)
                .unwrap_or(WeatherTypeKind::Unclassified),
            c @ 21..=28 => octant(c - Self::CYCLONIC_HYBRID_BASE)
                .map(WeatherTypeKind::CyclonicHybrid)
                .unwrap_or(WeatherTypeKind::Unclassified),
            _ => WeatherTypeKind::Unclassified,
        }
    }

    /// Octant of a directional or hybrid type.
    pub fn octant(self) -> Option<Octant> {
        match self.kind() {
            WeatherTypeKind::AnticyclonicHybrid(o)
            | WeatherTypeKind::Directional(o)
            | WeatherTypeKind::CyclonicHybrid(o) => Some(o),
            _ => None,
        }
    }
}

impl Default for WeatherType {
    fn default() -> Self {
        Self::UNCLASSIFIED
    }
}

impl fmt::Display for WeatherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<WeatherType> for i8 {
    fn from(t: WeatherType) -> i8 {
        t.0
    }
}

/// Inputs of the rules for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellState {
    pub f: f64,
    pub z: f64,
    pub octant: Option<Octant>,
}

/// One step of the assignment. `None` means the rule does not apply.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentRule {
    pub name: &'static str,
    pub assign: fn(&CellState) -> Option<WeatherType>,
}

/// The assignment rules in evaluation order.
pub const ASSIGNMENT_RULES: [AssignmentRule; 6] = [
    AssignmentRule {
        name: "anticyclonic hybrid",
        assign: anticyclonic_hybrid,
    },
    AssignmentRule {
        name: "directional",
        assign: directional,
    },
    AssignmentRule {
        name: "cyclonic",
        assign: cyclonic,
    },
    AssignmentRule {
        name: "anticyclonic",
        assign: anticyclonic,
    },
    AssignmentRule {
        name: "cyclonic hybrid",
        assign: cyclonic_hybrid,
    },
    AssignmentRule {
        name: "weak flow",
        assign: weak_flow,
    },
];

fn anticyclonic_hybrid(c: &CellState) -> Option<WeatherType> {
    if c.z < 0.0 {
        c.octant.map(WeatherType::anticyclonic_hybrid)
    } else {
        None
    }
}

fn directional(c: &CellState) -> Option<WeatherType> {
    if c.z.abs() < c.f {
        c.octant.map(WeatherType::directional)
    } else {
        None
    }
}

fn cyclonic(c: &CellState) -> Option<WeatherType> {
    (c.z.abs() > 2.0 * c.f && c.z > 0.0).then_some(WeatherType::CYCLONIC)
}

fn anticyclonic(c: &CellState) -> Option<WeatherType> {
    (c.z.abs() > 2.0 * c.f && c.z < 0.0).then_some(WeatherType::ANTICYCLONIC)
}

// Both bounds inclusive
fn cyclonic_hybrid(c: &CellState) -> Option<WeatherType> {
    let z = c.z.abs();
    if c.f <= z && z <= 2.0 * c.f && c.z > 0.0 {
        c.octant.map(WeatherType::cyclonic_hybrid)
    } else {
        None
    }
}

fn weak_flow(c: &CellState) -> Option<WeatherType> {
    (c.f < WEAK_FLOW_THRESHOLD && c.z.abs() < WEAK_FLOW_THRESHOLD)
        .then_some(WeatherType::UNCLASSIFIED)
}

/// Weather type of a single cell.
pub fn assign_weather_type(f: f64, z: f64, octant: Option<Octant>) -> WeatherType {
    if f.is_nan() || z.is_nan() {
        return WeatherType::UNCLASSIFIED;
    }

    let cell = CellState { f, z, octant };
    ASSIGNMENT_RULES
        .iter()
        .filter_map(|rule| (rule.assign)(&cell))
        .last()
        .unwrap_or(WeatherType::UNCLASSIFIED)
}

/// Names of the rules that match a cell, in evaluation order.
pub fn matched_rules(f: f64, z: f64, octant: Option<Octant>) -> Vec<&'static str> {
    let cell = CellState { f, z, octant };
    ASSIGNMENT_RULES
        .iter()
        .filter(|rule| (rule.assign)(&cell).is_some())
        .map(|rule| rule.name)
        .collect()
}

/// Weather types of whole arrays. All three inputs must share one shape.
pub fn assign_weather_types(
    f: &Array4<f64>,
    z: &Array4<f64>,
    octants: &Array4<Option<Octant>>,
) -> Result<Array4<WeatherType>> {
    if f.shape() != z.shape() || f.shape() != octants.shape() {
        return Err(LwtError::shape_mismatch(format!(
            "F {:?}, Z {:?} and octants {:?} differ",
            f.shape(),
            z.shape(),
            octants.shape()
        )));
    }

    Ok(Zip::from(f)
        .and(z)
        .and(octants)
        .par_map_collect(|&f, &z, &octant| assign_weather_type(f, z, octant)))
}
