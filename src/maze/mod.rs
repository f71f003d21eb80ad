pub mod cell;
pub mod coord;
mod scratch;

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};

pub use cell::{Cell, CellId, Door};
pub use coord::{Coord, Direction};
pub use scratch::Scratch;

use crate::config::GeneratorConfig;
use crate::error::{MazeError, MazeResult};
use crate::generators::{DisjointSets, Phase, Style, get_rng};

/// A height x width grid of cells joined by doors.
///
/// Surface cells occupy the first `height * width` arena slots in row-major order.
/// Tunnel ("under") cells created by weaving are appended after them.
pub struct Maze {
    height: usize,
    width: usize,
    zone: String,
    cells: Vec<Cell>,
    scratch: Scratch,
    /// Union-find state of the Kruskal family, when active
    pub(crate) sets: Option<DisjointSets>,
    rng: StdRng,
    pub(crate) style: Option<Style>,
    pub(crate) phase: Phase,
    config: GeneratorConfig,
}

impl Maze {
    /// Creates a fully walled maze seeded from OS entropy.
    ///
    /// # Panics
    /// If `height` or `width` is zero.
    pub fn new(height: usize, width: usize, zone: impl Into<String>) -> Self {
        Self::from_rng(height, width, zone.into(), get_rng(None))
    }

    /// Creates a fully walled maze whose every random choice derives from `seed`.
    ///
    /// # Panics
    /// If `height` or `width` is zero.
    pub fn with_seed(height: usize, width: usize, zone: impl Into<String>, seed: u64) -> Self {
        Self::from_rng(height, width, zone.into(), get_rng(Some(seed)))
    }

    fn from_rng(height: usize, width: usize, zone: String, rng: StdRng) -> Self {
        assert!(
            height > 0 && width > 0,
            "a maze needs at least one row and one column"
        );
        let cells: Vec<Cell> = (0..height)
            .flat_map(|x| (0..width).map(move |y| Coord::new(x as i32, y as i32)))
            .enumerate()
            .map(|(index, coord)| Cell::new(CellId::new(index), coord))
            .collect();
        let scratch = Scratch::with_len(cells.len());
        Maze {
            height,
            width,
            zone,
            cells,
            scratch,
            sets: None,
            rng,
            style: None,
            phase: Phase::NotStarted,
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Number of surface cells.
    pub fn size(&self) -> usize {
        self.height * self.width
    }

    /// Number of cells including tunnels.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn first_coord(&self) -> Coord {
        Coord::new(0, 0)
    }

    pub fn last_coord(&self) -> Coord {
        Coord::new(self.height as i32 - 1, self.width as i32 - 1)
    }

    pub fn first_cell(&self) -> &Cell {
        &self.cells[0]
    }

    pub fn last_cell(&self) -> &Cell {
        &self.cells[self.size() - 1]
    }

    pub fn is_valid_coord(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.height
            && (coord.y as usize) < self.width
    }

    /// Arena id of the surface cell at `coord`.
    ///
    /// # Errors
    /// `MazeError::OutOfBounds` for coordinates off the grid.
    pub fn id_at(&self, coord: Coord) -> MazeResult<CellId> {
        if !self.is_valid_coord(coord) {
            return Err(MazeError::OutOfBounds {
                coord,
                height: self.height,
                width: self.width,
            });
        }
        Ok(CellId::new(coord.x as usize * self.width + coord.y as usize))
    }

    pub fn get(&self, coord: Coord) -> MazeResult<&Cell> {
        Ok(&self.cells[self.id_at(coord)?.index()])
    }

    /// # Panics
    /// If `id` was not handed out by this maze.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.index()]
    }

    pub fn coord(&self, id: CellId) -> Coord {
        self.cells[id.index()].coord()
    }

    /// All cells, tunnels included.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn surface_cells(&self) -> &[Cell] {
        &self.cells[..self.size()]
    }

    /// Every surface coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |x| (0..width).map(move |y| Coord::new(x as i32, y as i32)))
    }

    /// Cells reachable from `coord` through real doors, in direction order.
    pub fn neighbors(&self, coord: Coord) -> MazeResult<Vec<CellId>> {
        Ok(self.get(coord)?.neighbors().collect())
    }

    /// Opens a door between `coord` and its neighbor in `direction`, on both sides.
    pub fn add_door(&mut self, coord: Coord, direction: Direction) -> MazeResult<()> {
        let from = self.id_at(coord)?;
        let to = self.id_at(coord.step(direction))?;
        self.link(from, direction, to)
    }

    /// Opens a door from a tunnel cell to the surface neighbor in `direction`.
    pub fn add_under_door(&mut self, under: CellId, direction: Direction) -> MazeResult<()> {
        let to = self.id_at(self.coord(under).step(direction))?;
        self.link(under, direction, to)
    }

    /// Writes the door into both slots.
    ///
    /// # Errors
    /// `MazeError::DoorTaken` if either slot already holds a door; nothing is written then.
    pub(crate) fn link(&mut self, from: CellId, direction: Direction, to: CellId) -> MazeResult<()> {
        for (id, slot) in [(from, direction), (to, direction.opposite())] {
            if self.cells[id.index()].has_door(slot) {
                return Err(MazeError::DoorTaken {
                    coord: self.coord(id),
                    direction: slot,
                });
            }
        }
        self.cells[from.index()].add_door(direction, Some(Door::Link { direction, to }))?;
        let back = direction.opposite();
        self.cells[to.index()].add_door(
            back,
            Some(Door::Link {
                direction: back,
                to: from,
            }),
        )
    }

    /// Clears the door at `coord` in `direction` along with its far end.
    pub fn remove_door(&mut self, coord: Coord, direction: Direction) -> MazeResult<()> {
        let from = self.id_at(coord)?;
        let door = self.cells[from.index()].door(direction);
        self.cells[from.index()].add_door(direction, None)?;
        if let Some(other) = door.and_then(Door::other_side) {
            let back = direction.opposite();
            if self.cells[other.index()].door(back).and_then(Door::other_side) == Some(from) {
                self.cells[other.index()].add_door(back, None)?;
            }
        }
        Ok(())
    }

    /// Creates (or returns the existing) tunnel cell beneath `coord`.
    pub fn create_under_cell(&mut self, coord: Coord) -> MazeResult<CellId> {
        let over = self.id_at(coord)?;
        if let Some(under) = self.cells[over.index()].under_cell() {
            return Ok(under);
        }
        let id = CellId::new(self.cells.len());
        let under = Cell::new_under(id, &self.cells[over.index()]);
        self.cells.push(under);
        self.scratch.push();
        self.cells[over.index()].set_under_cell(id);
        Ok(id)
    }

    /// Opens the entrance west of the first cell and the exit east of the last one.
    pub fn open_outer_walls(&mut self) -> MazeResult<()> {
        let last = self.size() - 1;
        self.cells[0].add_door(
            Direction::West,
            Some(Door::Outside {
                direction: Direction::West,
            }),
        )?;
        self.cells[last].add_door(
            Direction::East,
            Some(Door::Outside {
                direction: Direction::East,
            }),
        )
    }

    pub fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    pub(crate) fn scratch_mut(&mut self) -> &mut Scratch {
        &mut self.scratch
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn color(&self, id: CellId) -> u32 {
        self.scratch.color(id)
    }

    pub fn set_color(&mut self, id: CellId, color: u32) {
        self.scratch.set_color(id, color);
    }

    pub fn color_at(&self, coord: Coord) -> MazeResult<u32> {
        Ok(self.scratch.color(self.id_at(coord)?))
    }

    pub fn distance(&self, id: CellId) -> usize {
        self.scratch.distance(id)
    }

    pub fn prev(&self, id: CellId) -> Option<CellId> {
        self.scratch.prev(id)
    }

    /// Paints every cell, tunnels included.
    pub fn color_all(&mut self, color: u32) {
        self.scratch.fill_color(color);
    }

    /// Surface cells currently painted `color`.
    pub fn all_with_color(&self, color: u32) -> Vec<CellId> {
        self.surface_cells()
            .iter()
            .map(Cell::id)
            .filter(|&id| self.scratch.color(id) == color)
            .collect()
    }

    pub fn pick_random_coord(&mut self) -> Coord {
        let x = self.rng.random_range(0..self.height);
        let y = self.rng.random_range(0..self.width);
        Coord::new(x as i32, y as i32)
    }

    pub fn pick_random_cell(&mut self) -> CellId {
        let size = self.size();
        CellId::new(self.rng.random_range(0..size))
    }

    /// A uniformly chosen real door between two surface cells. Doors into or
    /// over a crossing are never picked, so tunnels stay whole.
    ///
    /// # Errors
    /// * `MazeError::DoorlessCell` if any surface cell has no real door
    /// * `MazeError::NoFrontier` if every door belongs to a crossing
    pub fn pick_random_door(&mut self) -> MazeResult<(Coord, Direction)> {
        if let Some(cell) = self
            .surface_cells()
            .iter()
            .find(|c| c.real_doors().next().is_none())
        {
            return Err(MazeError::DoorlessCell(cell.coord()));
        }
        let movable = |cell: &Cell| !cell.has_under_cell() && !cell.is_under_cell();
        let doors: Vec<(Coord, Direction)> = self
            .surface_cells()
            .iter()
            .filter(|c| movable(c))
            .flat_map(|c| {
                c.real_doors()
                    .filter(|d| d.other_side().is_some_and(|to| movable(&self.cells[to.index()])))
                    .map(|d| (c.coord(), d.direction()))
            })
            .collect();
        doors.choose(&mut self.rng).copied().ok_or(MazeError::NoFrontier)
    }

    /// The surface neighbor of `id` toward `direction`, if a new door could join
    /// the two: both slots empty and neither cell part of a crossing.
    fn carvable_neighbor(&self, id: CellId, direction: Direction) -> Option<CellId> {
        let cell = &self.cells[id.index()];
        let next = self.id_at(cell.coord().step(direction)).ok()?;
        let neighbor = &self.cells[next.index()];
        (!cell.has_door(direction)
            && !neighbor.has_door(direction.opposite())
            && !cell.has_under_cell()
            && !neighbor.has_under_cell())
        .then_some(next)
    }

    /// Directions out of `id` that cross a frontier wall: a carvable wall with
    /// a different color on the far side.
    pub fn frontier_directions(&self, id: CellId, unlocked_only: bool) -> Vec<Direction> {
        let color = self.scratch.color(id);
        Direction::ALL
            .into_iter()
            .filter(|&d| match self.carvable_neighbor(id, d) {
                Some(next) => {
                    let neighbor = &self.cells[next.index()];
                    self.scratch.color(next) != color
                        && (!unlocked_only
                            || (neighbor.is_free_to_link()
                                && neighbor.is_free_to_use_in_template()))
                }
                None => false,
            })
            .collect()
    }

    pub fn pick_random_bicolor_wall(&mut self, id: CellId) -> Option<Direction> {
        let choices = self.frontier_directions(id, false);
        choices.choose(&mut self.rng).copied()
    }

    /// Like [`Maze::pick_random_bicolor_wall`], but the far cell must be free of both locks.
    pub fn pick_random_bicolor_unlocked_wall(&mut self, id: CellId) -> Option<Direction> {
        let choices = self.frontier_directions(id, true);
        choices.choose(&mut self.rng).copied()
    }

    fn bicolor_wall(&self, coord: Coord, direction: Direction) -> Option<(Coord, Direction)> {
        let here = self.id_at(coord).ok()?;
        let there = self.carvable_neighbor(here, direction)?;
        (self.scratch.color(here) != self.scratch.color(there)).then_some((coord, direction))
    }

    /// Every frontier wall, each reported once from its north or west side.
    ///
    /// Walls next to a crossing never count: its slots belong to the tunnel.
    pub fn walls_between_colors(&self) -> Vec<(Coord, Direction)> {
        self.coords()
            .flat_map(|c| {
                [
                    self.bicolor_wall(c, Direction::East),
                    self.bicolor_wall(c, Direction::South),
                ]
            })
            .flatten()
            .collect()
    }

    /// Every pair of adjacent surface cells, each listed once from its south or west side.
    pub fn all_nextdoor_pairs(&self) -> Vec<(CellId, Direction, CellId)> {
        self.coords()
            .flat_map(|c| {
                [Direction::North, Direction::East].map(|d| {
                    match (self.id_at(c), self.id_at(c.step(d))) {
                        (Ok(a), Ok(b)) => Some((a, d, b)),
                        _ => None,
                    }
                })
            })
            .flatten()
            .collect()
    }

    /// Rewires one door: removes a random door and reconnects the two halves elsewhere.
    ///
    /// Leaves every cell colored 0.
    pub fn move_door(&mut self) -> MazeResult<()> {
        self.color_all(0);
        let (coord, direction) = self.pick_random_door()?;
        let far = self.cell(self.id_at(coord)?).door(direction).and_then(Door::other_side);
        self.remove_door(coord, direction)?;
        self.color_from(1, coord)?;
        if let Some(far) = far {
            self.color_from_cell(2, far)?;
        }
        let walls = self.walls_between_colors();
        match walls.choose(&mut self.rng).copied() {
            Some((c, d)) => {
                self.add_door(c, d)?;
                tracing::trace!("[move_door] moved {coord}{direction} to {c}{d}");
            }
            None => {
                // The removed door closed a loop; put it back.
                tracing::warn!("[move_door] no wall between halves after removing {coord}{direction}");
                self.add_door(coord, direction)?;
            }
        }
        self.color_all(0);
        Ok(())
    }
}

impl std::ops::Index<CellId> for Maze {
    type Output = Cell;

    fn index(&self, id: CellId) -> &Self::Output {
        &self.cells[id.index()]
    }
}
