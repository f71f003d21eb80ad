use std::collections::VecDeque;

use rand::seq::SliceRandom;

use crate::error::{MazeError, MazeResult};
use crate::maze::{CellId, Coord, Direction, Door, Maze};

impl Maze {
    /// Ids behind the real doors of `id`, by direction slot.
    fn linked(&self, id: CellId) -> [Option<CellId>; 4] {
        let cell = self.cell(id);
        Direction::ALL.map(|d| cell.door(d).and_then(Door::other_side))
    }

    /// Breadth-first search over real doors from `root`.
    ///
    /// Every reached cell is painted `color` and gets its `prev`/`distance` set.
    /// Returns the cells in visiting order, ending early at `stop` when given.
    fn breadth_first(&mut self, root: CellId, stop: Option<CellId>, color: u32) -> Vec<CellId> {
        let mut seen = vec![false; self.cell_count()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([root]);
        seen[root.index()] = true;

        let scratch = self.scratch_mut();
        scratch.reset_links();
        scratch.set_color(root, color);

        while let Some(id) = queue.pop_front() {
            order.push(id);
            if Some(id) == stop {
                break;
            }
            let distance = self.distance(id) + 1;
            for next in self.linked(id).into_iter().flatten() {
                if seen[next.index()] {
                    continue;
                }
                seen[next.index()] = true;
                let scratch = self.scratch_mut();
                scratch.set_prev(next, Some(id));
                scratch.set_distance(next, distance);
                scratch.set_color(next, color);
                queue.push_back(next);
            }
        }
        order
    }

    /// Shortest route from `from` to `to` through real doors, in forward order.
    ///
    /// The search runs backwards from `to` and paints everything it reaches with `color`.
    ///
    /// # Errors
    /// `MazeError::NoPath` when the two cells are not connected.
    pub fn path_from_to(&mut self, from: Coord, to: Coord, color: u32) -> MazeResult<Vec<Coord>> {
        let start = self.id_at(from)?;
        let goal = self.id_at(to)?;
        self.breadth_first(goal, Some(start), color);

        let mut path = vec![from];
        let mut current = start;
        while current != goal {
            current = self.prev(current).ok_or(MazeError::NoPath { from, to })?;
            path.push(self.coord(current));
        }
        Ok(path)
    }

    /// Shortest sequence of cells from `start` to `stop`, both included.
    ///
    /// # Errors
    /// `MazeError::NoPath` when `stop` cannot be reached.
    pub fn cells_from_to(
        &mut self,
        start: CellId,
        stop: CellId,
        color: u32,
    ) -> MazeResult<Vec<CellId>> {
        let order = self.breadth_first(start, Some(stop), color);
        if order.last() != Some(&stop) {
            return Err(MazeError::NoPath {
                from: self.coord(start),
                to: self.coord(stop),
            });
        }
        let mut path = vec![stop];
        let mut current = stop;
        while let Some(prev) = self.prev(current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Ok(path)
    }

    /// Eccentricity of `id`: the largest door-distance to any reachable cell.
    ///
    /// Repaints the maze (0 unreachable, 1 reachable) and leaves each cell's distance readable.
    pub fn distance_from(&mut self, id: CellId) -> usize {
        self.color_all(0);
        self.breadth_first(id, None, 1)
            .into_iter()
            .map(|c| self.distance(c))
            .max()
            .unwrap_or(0)
    }

    /// Whether a chain of real doors joins `a` and `b`. Leaves the scratch state untouched.
    pub fn is_reachable(&self, a: CellId, b: CellId) -> bool {
        let mut seen = vec![false; self.cell_count()];
        let mut queue = VecDeque::from([a]);
        seen[a.index()] = true;
        while let Some(id) = queue.pop_front() {
            if id == b {
                return true;
            }
            for next in self.linked(id).into_iter().flatten() {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Grid neighbors of `id` that a new corridor may enter: doorless cells, or `stop` itself.
    ///
    /// Directions are tried in random order so that ties between equal routes are broken randomly.
    pub fn unlinked_adjacents(&mut self, id: CellId, stop: CellId) -> Vec<CellId> {
        let coord = self.coord(id);
        let mut directions = Direction::ALL;
        directions.shuffle(self.rng());
        directions
            .into_iter()
            .filter_map(|d| self.id_at(coord.step(d)).ok())
            .filter(|&n| n == stop || self.cell(n).is_unlinked())
            .collect()
    }

    /// Shortest grid route from `start` to `stop` that only crosses doorless cells.
    ///
    /// Doors are ignored; the route is meant to be carved afterwards.
    ///
    /// # Errors
    /// `MazeError::UnreachableGeometry` when existing corridors wall `stop` off.
    pub fn shortest_unlinked_path(&mut self, start: CellId, stop: CellId) -> MazeResult<Vec<CellId>> {
        let mut prev: Vec<Option<CellId>> = vec![None; self.cell_count()];
        let mut seen = vec![false; self.cell_count()];
        let mut queue = VecDeque::from([start]);
        seen[start.index()] = true;

        while let Some(id) = queue.pop_front() {
            if id == stop {
                break;
            }
            for next in self.unlinked_adjacents(id, stop) {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    prev[next.index()] = Some(id);
                    queue.push_back(next);
                }
            }
        }

        if !seen[stop.index()] {
            return Err(MazeError::UnreachableGeometry {
                from: self.coord(start),
                to: self.coord(stop),
            });
        }
        let mut path = vec![stop];
        let mut current = stop;
        while let Some(p) = prev[current.index()] {
            path.push(p);
            current = p;
        }
        path.reverse();
        Ok(path)
    }
}
