//! Collision avoidance force.

use std::ops::Range;

use crate::layout::{NodeId, SimNode};
use crate::layout::simulation::Force;
use crate::layout::spatial_grid::SpatialGrid;

/// Deterministic stand-in for a random jiggle when two nodes coincide.
const JIGGLE: f64 = 1e-6;

/// Mutual repulsion between overlapping nodes.
///
/// Each pair closer than the sum of their collision radii is pushed apart
/// along the line between their velocity-projected centers, weighted so
/// the smaller node yields more. A spatial hash grid prunes the pair set;
/// the grid is rebuilt every application from the live node state.
pub struct CollideForce {
    strength: f64,
    iterations: usize,
    range: Range<usize>,
    grid: SpatialGrid,
}

impl CollideForce {
    pub fn new(strength: f64) -> Self {
        Self {
            strength,
            iterations: 1,
            range: 0..0,
            grid: SpatialGrid::new(1.0),
        }
    }
}

impl Force for CollideForce {
    fn initialize(&mut self, nodes: &[SimNode], range: Range<usize>) {
        let max_radius = nodes[range.clone()]
            .iter()
            .fold(0.0f64, |acc, n| acc.max(n.radius));
        // One cell fits the largest node's circle.
        self.grid = SpatialGrid::new((max_radius * 2.0).max(1.0));
        self.range = range;
    }

    fn apply(&mut self, nodes: &mut [SimNode], _alpha: f64) {
        let max_radius = nodes[self.range.clone()]
            .iter()
            .fold(0.0f64, |acc, n| acc.max(n.radius));

        for _ in 0..self.iterations {
            self.grid.clear();
            for i in self.range.clone() {
                let n = &nodes[i];
                self.grid.insert(NodeId(i), n.x + n.vx, n.y + n.vy, n.radius);
            }

            for i in self.range.clone() {
                let (xi, yi, ri) = {
                    let n = &nodes[i];
                    (n.x + n.vx, n.y + n.vy, n.radius)
                };
                // Inflate the query so any neighbor radius is covered.
                for candidate in self.grid.query(xi, yi, ri + max_radius) {
                    let j = candidate.0;
                    if j <= i {
                        continue;
                    }
                    let (xj, yj, rj) = {
                        let n = &nodes[j];
                        (n.x + n.vx, n.y + n.vy, n.radius)
                    };
                    let mut dx = xi - xj;
                    let mut dy = yi - yj;
                    let mut l = dx * dx + dy * dy;
                    let r = ri + rj;
                    if l >= r * r {
                        continue;
                    }
                    if dx == 0.0 {
                        dx = JIGGLE;
                        l += dx * dx;
                    }
                    if dy == 0.0 {
                        dy = JIGGLE;
                        l += dy * dy;
                    }
                    l = l.sqrt();
                    let push = (r - l) / l * self.strength;
                    let weight = (rj * rj) / (ri * ri + rj * rj);
                    let px = dx * push;
                    let py = dy * push;
                    nodes[i].vx += px * weight;
                    nodes[i].vy += py * weight;
                    nodes[j].vx -= px * (1.0 - weight);
                    nodes[j].vy -= py * (1.0 - weight);
                }
            }
        }
    }
}
