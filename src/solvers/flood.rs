use std::collections::VecDeque;

use crate::error::{MazeError, MazeResult};
use crate::maze::{CellId, Coord, Maze};

/// Breadth-first flood fill that paints every cell reachable through real doors.
///
/// While painting it counts cycles: each visited cell contributes
/// `max(0, same-colored neighbors - 1)`, which stays zero on a tree.
struct FloodFill<'a> {
    maze: &'a mut Maze,
    color: u32,
    cycles: usize,
    queue: VecDeque<CellId>,
}

impl<'a> FloodFill<'a> {
    fn new(maze: &'a mut Maze, color: u32) -> MazeResult<Self> {
        if maze.scratch().uses_color(color) {
            return Err(MazeError::ColorInUse(color));
        }
        Ok(FloodFill {
            maze,
            color,
            cycles: 0,
            queue: VecDeque::new(),
        })
    }

    fn explore(&mut self, id: CellId) {
        self.maze.set_color(id, self.color);
        let mut same = 0;
        for next in self.maze.cell(id).neighbors() {
            if self.maze.color(next) == self.color {
                same += 1;
            } else {
                self.queue.push_back(next);
            }
        }
        self.cycles += same.max(1) - 1;
    }

    fn run(mut self, start: CellId) -> usize {
        self.explore(start);
        while let Some(id) = self.queue.pop_front() {
            // Queued twice before being painted
            if self.maze.color(id) == self.color {
                continue;
            }
            self.explore(id);
        }
        self.cycles
    }
}

impl Maze {
    /// Paints everything reachable from `coord` with `color` and returns the cycle count.
    ///
    /// # Errors
    /// * `MazeError::ColorInUse` if any cell already carries `color`
    /// * `MazeError::OutOfBounds` for a coordinate off the grid
    pub fn color_from(&mut self, color: u32, coord: Coord) -> MazeResult<usize> {
        let start = self.id_at(coord)?;
        self.color_from_cell(color, start)
    }

    /// [`Maze::color_from`] starting at any cell, tunnel cells included.
    pub fn color_from_cell(&mut self, color: u32, start: CellId) -> MazeResult<usize> {
        let cycles = FloodFill::new(self, color)?.run(start);
        tracing::trace!("[color_from] color {color} from {start}: {cycles} cycles");
        Ok(cycles)
    }
}
