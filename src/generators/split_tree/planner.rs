use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::MazeResult;
use crate::generators::{SilentProgress, Style, StyleChoice};
use crate::maze::{Coord, Direction, Maze};

const PATH_COLOR: u32 = 7;

/// Plans one long corridor through a `grid_x`x`grid_y` grid of `sub_x`x`sub_y` blocks.
///
/// A small "link map" maze decides the order in which blocks are visited. Each
/// block then gets its own maze, and the corridor follows that maze's solution
/// from where it enters the block to a random point on the wall it leaves by.
pub struct GridPathPlanner {
    grid_x: usize,
    grid_y: usize,
    sub_x: usize,
    sub_y: usize,
    outer: Style,
    inner: Style,
    rng: StdRng,
}

impl GridPathPlanner {
    pub fn new(grid_x: usize, grid_y: usize, sub_x: usize, sub_y: usize, seed: u64) -> Self {
        GridPathPlanner {
            grid_x,
            grid_y,
            sub_x,
            sub_y,
            outer: Style::Walk,
            inner: Style::Walk,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Carving styles for the link map and for the blocks.
    pub fn with_styles(mut self, outer: Style, inner: Style) -> Self {
        self.outer = outer;
        self.inner = inner;
        self
    }

    fn solve(
        &mut self,
        height: usize,
        width: usize,
        style: Style,
        from: Coord,
        to: Coord,
    ) -> MazeResult<Vec<Coord>> {
        let mut maze = Maze::with_seed(height, width, "link_map", self.rng.random());
        maze.connect_all(StyleChoice::Fixed(style), &mut SilentProgress)?;
        maze.path_from_to(from, to, PATH_COLOR)
    }

    /// The order in which blocks are visited, from the top-left block to the bottom-right one.
    pub fn master_path(&mut self) -> MazeResult<Vec<Coord>> {
        let end = Coord::new(self.grid_x as i32 - 1, self.grid_y as i32 - 1);
        self.solve(self.grid_x, self.grid_y, self.outer, Coord::new(0, 0), end)
    }

    /// Length of a block wall running along `direction`.
    fn wall_length(&self, direction: Direction) -> usize {
        if direction.is_vertical() {
            self.sub_x
        } else {
            self.sub_y
        }
    }

    /// The cell `delta` along the block wall facing `direction`.
    fn delta_of_wall(&self, direction: Direction, delta: i32) -> Coord {
        let (last_x, last_y) = (self.sub_x as i32 - 1, self.sub_y as i32 - 1);
        match direction {
            Direction::North => Coord::new(0, delta),
            Direction::East => Coord::new(delta, last_y),
            Direction::South => Coord::new(last_x, delta),
            Direction::West => Coord::new(delta, 0),
        }
    }

    /// Matching cells on either side of the wall between two blocks, where
    /// the second block lies toward `direction` from the first.
    fn intergrid_door(&mut self, direction: Direction) -> (Coord, Coord) {
        let length = self.wall_length(Direction::from_index(direction.index() + 1));
        let delta = self.rng.random_range(0..length.max(1)) as i32;
        (
            self.delta_of_wall(direction, delta),
            self.delta_of_wall(direction.opposite(), delta),
        )
    }

    /// Block-local entry and exit points, two per block of `master`.
    fn inner_coordinates(&mut self, master: &[Coord]) -> MazeResult<Vec<Coord>> {
        let mut inner = vec![Coord::new(0, 0)];
        for pair in master.windows(2) {
            let (exit, entry) = self.intergrid_door(pair[0].direction_to(pair[1])?);
            inner.push(exit);
            inner.push(entry);
        }
        inner.push(Coord::new(self.sub_x as i32 - 1, self.sub_y as i32 - 1));
        Ok(inner)
    }

    fn inner_subpath(&mut self, start: Coord, end: Coord) -> MazeResult<Vec<Coord>> {
        self.solve(self.sub_x, self.sub_y, self.inner, start, end)
    }

    /// Moves a block-local path into block `block` of the whole grid.
    fn translate(&self, block: Coord, path: &[Coord]) -> Vec<Coord> {
        let (dx, dy) = (block.x * self.sub_x as i32, block.y * self.sub_y as i32);
        path.iter().map(|c| c.shift(dx, dy)).collect()
    }

    /// The whole corridor, from (0,0) to the far corner of the last block.
    pub fn make_path(&mut self) -> MazeResult<Vec<Coord>> {
        let master = self.master_path()?;
        let inner = self.inner_coordinates(&master)?;
        let mut path = Vec::with_capacity(self.sub_x * self.sub_y * master.len());
        for (block, ends) in master.iter().zip(inner.chunks(2)) {
            let subpath = self.inner_subpath(ends[0], ends[1])?;
            path.extend(self.translate(*block, &subpath));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_path_follows_zigzag() {
        let mut planner =
            GridPathPlanner::new(3, 3, 5, 5, 1).with_styles(Style::ZigZag, Style::ZigZag);
        let master = planner.master_path().unwrap();
        assert_eq!(master[0], Coord::new(0, 0));
        assert_eq!(master[1], Coord::new(0, 1));
        assert_eq!(master[4], Coord::new(1, 1));
        assert_eq!(master[7], Coord::new(2, 1));
        assert_eq!(master[8], Coord::new(2, 2));
    }

    #[test]
    fn test_wall_length() {
        let planner = GridPathPlanner::new(3, 3, 5, 20, 1);
        assert_eq!(planner.wall_length(Direction::East), 20);
        assert_eq!(planner.wall_length(Direction::South), 5);
    }

    #[test]
    fn test_intergrid_door() {
        let mut planner = GridPathPlanner::new(3, 3, 200, 2, 1);
        for _ in 0..10 {
            let (exit, entry) = planner.intergrid_door(Direction::North);
            assert_eq!(exit.x, 0);
            assert_eq!(entry.x, 199);
            assert!((0..2).contains(&exit.y));
            assert_eq!(exit.y, entry.y);
        }
    }

    #[test]
    fn test_inner_coordinates() {
        let mut planner =
            GridPathPlanner::new(3, 3, 200, 2, 1).with_styles(Style::ZigZag, Style::ZigZag);
        let master = planner.master_path().unwrap();
        let inner = planner.inner_coordinates(&master).unwrap();
        assert_eq!(inner.len(), 18);
        assert_eq!(inner[0], Coord::new(0, 0));
        assert_eq!(inner[17], Coord::new(199, 1));
        assert_eq!(inner[1].y, 1);
        assert_eq!(inner[1].x, inner[2].x);
        assert_eq!(inner[2].y, 0);
    }

    #[test]
    fn test_translate() {
        let planner = GridPathPlanner::new(3, 3, 2, 2, 1);
        let moved = planner.translate(
            Coord::new(1, 1),
            &[Coord::new(0, 0), Coord::new(0, 1)],
        );
        assert_eq!(moved, vec![Coord::new(2, 2), Coord::new(2, 3)]);
    }

    #[test]
    fn test_inner_subpath() {
        let mut planner =
            GridPathPlanner::new(3, 3, 5, 5, 1).with_styles(Style::ZigZag, Style::ZigZag);
        let path = planner
            .inner_subpath(Coord::new(0, 3), Coord::new(2, 4))
            .unwrap();
        assert_eq!(path.len(), 12);
    }

    #[test]
    fn test_make_path_is_a_walk() {
        let mut planner = GridPathPlanner::new(4, 3, 5, 6, 9);
        let path = planner.make_path().unwrap();
        assert_eq!(path[0], Coord::new(0, 0));
        assert_eq!(path.last(), Some(&Coord::new(19, 17)));
        for pair in path.windows(2) {
            assert!(pair[0].direction_to(pair[1]).is_ok(), "{} {}", pair[0], pair[1]);
        }
        let mut seen = path.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), path.len());
    }
}
