// Force-directed layout pipeline for the radar chart.
//
// Goals:
// - Deterministic: no randomness, no time budgets
// - One owner: the pipeline holds the node arena; forces borrow it per tick
// - Three passes over shared nodes:
//     placement  — radial pull + quadrant confinement, blips only
//     separation — collision avoidance, blips and placeholders
//     trailing   — placeholders pinned behind their dad
// - Separation and trailing read placement's output, so they are gated
//   until the placement pass has ticked at least once
//
// Submodules:
// - simulation: alpha schedule, Force trait, per-pass stepping
// - forces: the four force implementations
// - spatial_grid: collision broad phase

use std::ops::Range;

pub mod forces;
pub mod simulation;
mod spatial_grid;

use forces::{CollideForce, QuadrantConfineForce, RadialForce, TrailForce};
use simulation::SimPass;

/// Index of a node in the pipeline's arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// What a simulation node stands for. Forces branch on this tag, never on
/// which fields happen to be populated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Blip,
    Placeholder,
}

/// One node in the simulation arena.
///
/// Blips occupy the low indices, placeholders follow; `dad` points from a
/// placeholder back into the blip span and is only ever read.
#[derive(Debug, Clone)]
pub struct SimNode {
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Wedge this node belongs to. Placeholders inherit their dad's.
    pub quadrant_index: usize,
    /// Target radial distance from the center. Zero for placeholders.
    pub orbit: f64,
    /// Collision radius.
    pub radius: f64,
    /// Owning blip, for placeholders.
    pub dad: Option<NodeId>,
    /// Position among siblings of the same dad, for placeholders.
    pub nth: usize,
}

impl SimNode {
    pub fn blip(quadrant_index: usize, orbit: f64, radius: f64) -> Self {
        Self {
            kind: NodeKind::Blip,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            quadrant_index,
            orbit,
            radius,
            dad: None,
            nth: 0,
        }
    }

    pub fn placeholder(dad: NodeId, nth: usize, radius: f64, quadrant_index: usize) -> Self {
        Self {
            kind: NodeKind::Placeholder,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            quadrant_index,
            orbit: 0.0,
            radius,
            dad: Some(dad),
            nth,
        }
    }
}

/// Tuning for the chart and its simulation passes.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    /// Padding added to half the symbol extent to form the collision radius.
    pub collide_margin: f64,
    /// Side length of the rect symbol.
    pub symbol_size: f64,
    /// Radius of the circle symbol.
    pub symbol_radius: f64,
    /// Orbit assigned to the maximum score. The minimum score maps onto
    /// the chart radius; this upper bound stays fixed regardless of chart
    /// size, so the mapping direction can invert on small charts.
    pub max_score_orbit: f64,
    pub radial_strength: f64,
    pub confine_strength: f64,
    pub collide_strength: f64,
    /// Alpha decay per tick, shared by all three passes.
    pub alpha_decay: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            collide_margin: 10.0,
            symbol_size: 22.0,
            symbol_radius: 12.0,
            max_score_orbit: 50.0,
            radial_strength: 0.1,
            confine_strength: 1.0,
            collide_strength: 0.999,
            alpha_decay: 0.01,
        }
    }
}

impl ChartConfig {
    /// Chart radius, which doubles as the base of the score scale.
    pub fn radius(&self) -> f64 {
        (self.width / 2.0).min(self.height / 2.0) * 0.95
    }
}

/// The three chained simulation passes over one shared node arena.
///
/// Owns every node and every force. `tick` steps the passes in their
/// documented order; `stop` halts all three at once, which callers must
/// do before discarding the chart that owns the pipeline.
pub struct LayoutPipeline {
    nodes: Vec<SimNode>,
    blip_count: usize,
    placement: SimPass,
    separation: SimPass,
    trailing: SimPass,
    ticks: u64,
}

impl LayoutPipeline {
    /// Build the pipeline over a fully-populated arena. `nodes` holds the
    /// blips in `[0, blip_count)` with placeholders after.
    pub fn new(nodes: Vec<SimNode>, blip_count: usize, config: &ChartConfig) -> Self {
        let blip_range: Range<usize> = 0..blip_count;
        let all_range: Range<usize> = 0..nodes.len();
        let placeholder_range: Range<usize> = blip_count..nodes.len();

        let placement = SimPass::new(
            vec![
                Box::new(RadialForce::new(config.radial_strength)),
                Box::new(QuadrantConfineForce::new(config.confine_strength)),
            ],
            blip_range,
            &nodes,
            config.alpha_decay,
        );
        let separation = SimPass::new(
            vec![Box::new(CollideForce::new(config.collide_strength))],
            all_range,
            &nodes,
            config.alpha_decay,
        );
        let trailing = SimPass::new(
            vec![Box::new(TrailForce::new())],
            placeholder_range,
            &nodes,
            config.alpha_decay,
        );

        Self {
            nodes,
            blip_count,
            placement,
            separation,
            trailing,
            ticks: 0,
        }
    }

    /// Step every active pass once. Separation and trailing only join in
    /// after placement has had a tick, since collision geometry and dad
    /// positions are meaningless before then. Trailing runs last so its
    /// writes win over separation's within the tick.
    pub fn tick(&mut self) -> bool {
        let mut active = self.placement.tick(&mut self.nodes);
        if self.ticks > 0 {
            active |= self.separation.tick(&mut self.nodes);
            active |= self.trailing.tick(&mut self.nodes);
        } else {
            active |= self.separation.is_running();
            active |= self.trailing.is_running();
        }
        self.ticks += 1;
        active
    }

    /// Tick until every pass has settled.
    pub fn settle(&mut self) {
        while self.tick() {}
    }

    pub fn stop(&mut self) {
        self.placement.stop();
        self.separation.stop();
        self.trailing.stop();
    }

    pub fn restart(&mut self) {
        self.placement.restart();
        self.separation.restart();
        self.trailing.restart();
        self.ticks = 0;
    }

    pub fn is_running(&self) -> bool {
        self.placement.is_running()
            || self.separation.is_running()
            || self.trailing.is_running()
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn blip_count(&self) -> usize {
        self.blip_count
    }
}
