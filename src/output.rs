//! Output types for frontend consumption.
//!
//! These structs are serialized to JSON and handed to the embedding
//! frontend, either as the wasm boundary's return value or from
//! `RadarChart::snapshot`.

use serde::Serialize;

/// A laid-out blip ready for a frontend to display.
#[derive(Debug, Clone, Serialize)]
pub struct BlipOutput {
    pub name: String,
    pub quadrant: String,
    pub quadrant_index: usize,
    pub score: f64,
    /// Symbol element name: "rect" or "circle".
    pub shape: String,
    pub x: f64,
    pub y: f64,
    /// Target radial distance the placement pass aimed for.
    pub orbit: f64,
    /// Collision radius enforced by the separation pass.
    pub radius: f64,
}

/// A placeholder circle reserving label space behind its dad.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceholderOutput {
    /// Name of the owning blip.
    pub dad: String,
    pub nth: usize,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
}

/// Error information for the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// The combined output sent to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct ChartOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blips: Vec<BlipOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub placeholders: Vec<PlaceholderOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ChartOutput {
    /// Output carrying nothing but an error message.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            blips: Vec::new(),
            placeholders: Vec::new(),
            error: Some(ErrorInfo {
                message: message.into(),
            }),
        }
    }
}
