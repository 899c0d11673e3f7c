// Spatial hash grid for the collision broad phase.
//
// Instead of testing every node pair, the collision force bins nodes by
// their circle's bounding square and only pairs up nodes sharing a cell.

use std::collections::{HashMap, HashSet};

use super::NodeId;

/// A spatial hash grid over circle bounding boxes.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Size of each cell in the grid.
    cell_size: f64,
    /// Map from cell coordinates to the nodes whose circle touches that cell.
    cells: HashMap<(i64, i64), Vec<NodeId>>,
}

impl SpatialGrid {
    /// Create a new spatial grid with the given cell size.
    /// Cell size should be roughly the diameter of the largest node.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(1.0), // Avoid degenerate cells
            cells: HashMap::new(),
        }
    }

    /// Compute which cells a circle's bounding square overlaps.
    fn cell_range(&self, x: f64, y: f64, r: f64) -> Vec<(i64, i64)> {
        let min_x = ((x - r) / self.cell_size).floor() as i64;
        let max_x = ((x + r) / self.cell_size).floor() as i64;
        let min_y = ((y - r) / self.cell_size).floor() as i64;
        let max_y = ((y + r) / self.cell_size).floor() as i64;

        let mut cells = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                cells.push((cx, cy));
            }
        }
        cells
    }

    /// Insert a node's circle into the grid.
    pub fn insert(&mut self, id: NodeId, x: f64, y: f64, r: f64) {
        for cell in self.cell_range(x, y, r) {
            self.cells.entry(cell).or_default().push(id);
        }
    }

    /// Query for nodes whose circle might overlap the given circle.
    /// Note: this may include false positives; caller does the exact check.
    pub fn query(&self, x: f64, y: f64, r: f64) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();

        for cell in self.cell_range(x, y, r) {
            if let Some(ids) = self.cells.get(&cell) {
                for &id in ids {
                    if seen.insert(id) {
                        result.push(id);
                    }
                }
            }
        }
        result
    }

    /// Clear the grid for the next tick.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
