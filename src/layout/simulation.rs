//! Tick-based force simulation engine.
//!
//! One [`SimPass`] owns a set of forces and an alpha schedule, and steps
//! them over a contiguous range of the shared node arena. The pass never
//! copies nodes: forces receive the arena by reference on every tick and
//! any persistent state arrives through [`Force::initialize`].

use std::ops::Range;

use super::SimNode;

/// Alpha bookkeeping for one simulation pass.
///
/// Alpha starts at 1.0 and relaxes toward `alpha_target` by `alpha_decay`
/// per tick; the pass stops once it drops below `alpha_min`. Velocities
/// are damped by `velocity_decay` before integration.
#[derive(Debug, Clone)]
pub struct SimState {
    alpha: f64,
    alpha_min: f64,
    alpha_decay: f64,
    alpha_target: f64,
    velocity_decay: f64,
    running: bool,
}

impl SimState {
    pub fn new(alpha_decay: f64) -> Self {
        Self {
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay,
            alpha_target: 0.0,
            velocity_decay: 0.6,
            running: true,
        }
    }

    /// Advance alpha by one tick. Returns the alpha to run the tick with,
    /// or `None` once the pass has settled. The tick on which alpha first
    /// crosses `alpha_min` still runs; the next call returns `None`.
    pub fn advance(&mut self) -> Option<f64> {
        if !self.running {
            return None;
        }
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        if self.alpha < self.alpha_min {
            self.running = false;
        }
        Some(self.alpha)
    }

    pub fn velocity_decay(&self) -> f64 {
        self.velocity_decay
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn restart(&mut self) {
        self.alpha = 1.0;
        self.running = true;
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new(0.01)
    }
}

/// A force contributing velocity or position corrections each tick.
///
/// Forces hold no node copies. The arena slice and the pass's index range
/// are handed over once through `initialize`; `apply` then mutates nodes
/// in place. A force may read nodes outside its range (a placeholder
/// looking up its dad) but must only write inside it.
pub trait Force {
    fn initialize(&mut self, _nodes: &[SimNode], _range: Range<usize>) {}

    fn apply(&mut self, nodes: &mut [SimNode], alpha: f64);
}

/// One simulation pass: a force set plus alpha schedule over an arena
/// index range.
pub struct SimPass {
    range: Range<usize>,
    forces: Vec<Box<dyn Force>>,
    state: SimState,
}

impl SimPass {
    pub fn new(
        mut forces: Vec<Box<dyn Force>>,
        range: Range<usize>,
        nodes: &[SimNode],
        alpha_decay: f64,
    ) -> Self {
        for force in &mut forces {
            force.initialize(nodes, range.clone());
        }
        Self {
            range,
            forces,
            state: SimState::new(alpha_decay),
        }
    }

    /// Run one tick: apply every force, then damp and integrate velocities
    /// for the nodes in this pass's range. Returns false once settled.
    pub fn tick(&mut self, nodes: &mut [SimNode]) -> bool {
        let Some(alpha) = self.state.advance() else {
            return false;
        };
        for force in &mut self.forces {
            force.apply(nodes, alpha);
        }
        let decay = self.state.velocity_decay();
        for node in &mut nodes[self.range.clone()] {
            node.vx *= decay;
            node.x += node.vx;
            node.vy *= decay;
            node.y += node.vy;
        }
        true
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn stop(&mut self) {
        self.state.stop();
    }

    pub fn restart(&mut self) {
        self.state.restart();
    }
}
