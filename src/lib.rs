//! Radar chart layout core.
//!
//! Places scored items ("blips") on a quadrant radar chart: each blip is
//! pulled onto an orbit derived from its score, confined to its
//! quadrant's angular wedge, separated from its neighbors by a collision
//! pass, and trailed by invisible placeholder circles that reserve space
//! for its label. Rendering and measurement happen behind bridge traits;
//! a web-sys SVG implementation of both ships in the wasm module.

mod blip;
mod chart;
mod layout;
mod output;
mod render;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use blip::{Blip, InputError, LinearScale, ShapeKind, SimulationBlip, build_simulation_blips,
    unique_quadrant_names};
pub use chart::{InteractionHandlers, RadarChart};
pub use layout::{ChartConfig, LayoutPipeline, NodeId, NodeKind, SimNode};
pub use output::{BlipOutput, ChartOutput, ErrorInfo, PlaceholderOutput};
pub use render::{ElementHandle, MeasureBridge, PointerEventKind, PointerHandler, RenderBridge,
    Size, Surface};
