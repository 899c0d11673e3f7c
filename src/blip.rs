//! Blip input model and quadrant assignment.
//!
//! Turns the caller's raw items into sized simulation blips:
//! - Distinct quadrant names indexed in first-seen order
//! - Score mapped to an orbit radius via a linear scale
//! - Symbol shape cycled by quadrant index

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single charted item, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blip {
    pub quadrant: String,
    pub name: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// Symbol shapes, cycled by quadrant index. The string form is the
/// SVG element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
}

impl ShapeKind {
    /// Shape rotation over quadrant indices.
    pub const ROTATION: [ShapeKind; 2] = [ShapeKind::Rect, ShapeKind::Circle];

    pub fn for_quadrant(quadrant_index: usize) -> Self {
        Self::ROTATION[quadrant_index % Self::ROTATION.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
        }
    }
}

/// Rejected input, reported before any simulation is built.
#[derive(Debug, Clone, PartialEq)]
pub struct InputError {
    pub msg: String,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Input error: {}", self.msg)
    }
}

/// Linear mapping from a score domain onto a radius range.
///
/// A zero-width domain degenerates to the lower bound of the range, so
/// collections where every score is equal still get a defined orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    pub fn scale(&self, t: f64) -> f64 {
        if self.d1 == self.d0 {
            return self.r0;
        }
        self.r0 + (t - self.d0) * (self.r1 - self.r0) / (self.d1 - self.d0)
    }
}

/// A blip with its simulation inputs attached.
#[derive(Debug, Clone)]
pub struct SimulationBlip {
    pub blip: Blip,
    /// Index into the first-seen list of distinct quadrant names.
    pub quadrant_index: usize,
    /// Target radial distance from the chart center.
    pub orbit: f64,
    pub shape: ShapeKind,
}

/// Distinct quadrant names in first-occurrence order.
pub fn unique_quadrant_names(blips: &[Blip]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for blip in blips {
        if !names.iter().any(|n| *n == blip.quadrant) {
            names.push(blip.quadrant.clone());
        }
    }
    names
}

/// Attach quadrant indices, orbits and shapes to the caller's blips.
///
/// The score scale maps `[min(score), max(score)]` onto
/// `[base_radius, max_score_orbit]` literally: the minimum score lands on
/// `base_radius` and the maximum on `max_score_orbit`, even when that
/// ordering inverts the visual direction.
pub fn build_simulation_blips(
    base_radius: f64,
    max_score_orbit: f64,
    blips: &[Blip],
) -> Result<Vec<SimulationBlip>, InputError> {
    if blips.is_empty() {
        return Err(InputError {
            msg: "cannot lay out an empty blip collection".to_string(),
        });
    }

    let names = unique_quadrant_names(blips);
    let (min_score, max_score) = blips.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), blip| (lo.min(blip.score), hi.max(blip.score)),
    );
    let scale = LinearScale::new((min_score, max_score), (base_radius, max_score_orbit));

    Ok(blips
        .iter()
        .map(|blip| {
            let quadrant_index = names
                .iter()
                .position(|n| *n == blip.quadrant)
                .unwrap_or(0);
            SimulationBlip {
                blip: blip.clone(),
                quadrant_index,
                orbit: scale.scale(blip.score),
                shape: ShapeKind::for_quadrant(quadrant_index),
            }
        })
        .collect())
}
