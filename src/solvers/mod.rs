//! Breadth-first traversals over the door graph: flood fills, shortest paths and distances.

mod bfs;
mod flood;

use crate::error::MazeResult;
use crate::maze::{CellId, Maze};

/// Result of checking a maze for the spanning-tree property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    /// Cycles found by the flood fill from the first cell
    pub cycles: usize,
    /// Surface cells reached from the first cell
    pub reachable: usize,
    /// Surface cells in the maze
    pub total: usize,
}

impl Validation {
    /// A perfect maze is a spanning tree: connected and acyclic.
    pub fn is_perfect(&self) -> bool {
        self.cycles == 0 && self.reachable == self.total
    }
}

impl Maze {
    /// Flood-fills from the first cell and reports cycles and coverage. Leaves every cell colored 0.
    pub fn validate(&mut self) -> MazeResult<Validation> {
        self.color_all(0);
        let cycles = self.color_from(1, self.first_coord())?;
        let reachable = self.all_with_color(1).len();
        self.color_all(0);
        Ok(Validation {
            cycles,
            reachable,
            total: self.size(),
        })
    }

    /// The route from the entrance cell to the exit cell.
    pub fn solve(&mut self, color: u32) -> MazeResult<Vec<CellId>> {
        let first = self.first_cell().id();
        let last = self.last_cell().id();
        self.cells_from_to(first, last, color)
    }
}
