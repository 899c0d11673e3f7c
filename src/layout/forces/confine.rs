//! Quadrant confinement force.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::Range;

use super::non_zero;
use crate::layout::SimNode;
use crate::layout::simulation::Force;

/// Angular wedge owned by a quadrant, in SVG (y-down) coordinates:
/// quadrant 0 is the top-right sector, then clockwise through
/// bottom-right, bottom-left and top-left. Indices past 3 wrap.
pub fn wedge(quadrant_index: usize) -> (f64, f64) {
    let max = (quadrant_index % 4) as f64 * FRAC_PI_2;
    (max - FRAC_PI_2, max)
}

/// Pushes a node back toward its quadrant's wedge whenever its angle from
/// the center strays outside it. The corrective target is the point at the
/// node's current radial distance on the nearer wedge boundary, so the
/// radial force keeps sole ownership of the orbit distance.
pub struct QuadrantConfineForce {
    strength: f64,
    range: Range<usize>,
}

impl QuadrantConfineForce {
    pub fn new(strength: f64) -> Self {
        Self {
            strength,
            range: 0..0,
        }
    }
}

impl Force for QuadrantConfineForce {
    fn initialize(&mut self, _nodes: &[SimNode], range: Range<usize>) {
        self.range = range;
    }

    fn apply(&mut self, nodes: &mut [SimNode], alpha: f64) {
        for node in &mut nodes[self.range.clone()] {
            let dx = non_zero(node.x);
            let dy = non_zero(node.y);
            let rho = (dx * dx + dy * dy).sqrt();
            let (min_angle, max_angle) = wedge(node.quadrant_index);

            let mut theta = dy.atan2(dx);
            while theta < min_angle {
                theta += TAU;
            }
            if theta <= max_angle {
                continue;
            }

            // Outside the wedge: clamp to whichever boundary is angularly
            // closer, keeping the current distance from the center.
            let past_max = theta - max_angle;
            let short_of_min = min_angle + TAU - theta;
            let target = if past_max <= short_of_min {
                max_angle
            } else {
                min_angle
            };
            let tx = rho * target.cos();
            let ty = rho * target.sin();
            node.vx += (tx - node.x) * self.strength * alpha;
            node.vy += (ty - node.y) * self.strength * alpha;
        }
    }
}
