use std::fmt;

use crate::error::{MazeError, MazeResult};
use crate::maze::{Coord, Direction};

/// Index of a cell in its maze's arena. Ids grow monotonically as cells are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(usize);

impl CellId {
    pub(crate) const fn new(index: usize) -> Self {
        CellId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One end of a door, as stored in a cell's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Door {
    /// Leads to another cell of the same maze.
    Link { direction: Direction, to: CellId },
    /// Boundary opening with nothing on the far side.
    Outside { direction: Direction },
}

impl Door {
    pub fn direction(self) -> Direction {
        match self {
            Door::Link { direction, .. } | Door::Outside { direction } => direction,
        }
    }

    /// The cell on the far side, if any.
    pub fn other_side(self) -> Option<CellId> {
        match self {
            Door::Link { to, .. } => Some(to),
            Door::Outside { .. } => None,
        }
    }

    pub fn is_real_door(self) -> bool {
        matches!(self, Door::Link { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    id: CellId,
    coord: Coord,
    /// Door slots indexed by `Direction::index`
    doors: [Option<Door>; 4],
    /// Tunnel cell sharing this coordinate
    under: Option<CellId>,
    /// Set on tunnel cells, pointing back at the surface cell
    over: Option<CellId>,
    free_template: bool,
    free_link: bool,
}

impl Cell {
    pub(crate) fn new(id: CellId, coord: Coord) -> Self {
        Cell {
            id,
            coord,
            doors: [None; 4],
            under: None,
            over: None,
            free_template: true,
            free_link: true,
        }
    }

    pub(crate) fn new_under(id: CellId, over: &Cell) -> Self {
        Cell {
            over: Some(over.id),
            ..Cell::new(id, over.coord)
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn door(&self, direction: Direction) -> Option<Door> {
        self.doors[direction.index()]
    }

    /// Sets or clears one slot.
    ///
    /// # Errors
    /// `MazeError::InvalidDoor` when the door faces a different direction than the slot.
    pub fn add_door(&mut self, direction: Direction, door: Option<Door>) -> MazeResult<()> {
        if let Some(door) = door
            && door.direction() != direction
        {
            return Err(MazeError::InvalidDoor {
                slot: direction,
                door: door.direction(),
            });
        }
        self.doors[direction.index()] = door;
        Ok(())
    }

    /// Counts outside doors too.
    pub fn has_door(&self, direction: Direction) -> bool {
        self.doors[direction.index()].is_some()
    }

    pub fn door_count(&self) -> usize {
        self.doors.iter().flatten().count()
    }

    pub fn is_unlinked(&self) -> bool {
        self.door_count() == 0
    }

    /// Doors leading to other cells, in direction order.
    pub fn real_doors(&self) -> impl Iterator<Item = Door> + '_ {
        self.doors.iter().flatten().copied().filter(|d| d.is_real_door())
    }

    /// Cells reachable through real doors, in direction order.
    pub fn neighbors(&self) -> impl Iterator<Item = CellId> + '_ {
        self.doors.iter().flatten().filter_map(|d| d.other_side())
    }

    pub fn under_cell(&self) -> Option<CellId> {
        self.under
    }

    pub fn has_under_cell(&self) -> bool {
        self.under.is_some()
    }

    pub fn over_cell(&self) -> Option<CellId> {
        self.over
    }

    pub fn is_under_cell(&self) -> bool {
        self.over.is_some()
    }

    pub(crate) fn set_under_cell(&mut self, under: CellId) {
        self.under = Some(under);
    }

    pub fn is_free_to_use_in_template(&self) -> bool {
        self.free_template
    }

    pub fn is_free_to_link(&self) -> bool {
        self.free_link
    }

    /// Once locked, a cell never takes part in another template.
    pub fn lock_template(&mut self) {
        self.free_template = false;
    }

    /// Once locked, a cell is never joined by a plain Kruskal edge.
    pub fn lock_link(&mut self) {
        self.free_link = false;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_under_cell() {
            write!(f, "UnderCell{}{}", self.id, self.coord)
        } else {
            write!(f, "Cell{}{}", self.id, self.coord)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_clear_door() {
        let mut cell = Cell::new(CellId::new(0), Coord::new(0, 0));
        assert!(cell.is_unlinked());
        let door = Door::Link {
            direction: Direction::East,
            to: CellId::new(1),
        };
        cell.add_door(Direction::East, Some(door)).unwrap();
        assert!(cell.has_door(Direction::East));
        assert_eq!(cell.neighbors().collect::<Vec<_>>(), vec![CellId::new(1)]);
        cell.add_door(Direction::East, None).unwrap();
        assert!(!cell.has_door(Direction::East));
        assert!(cell.is_unlinked());
    }

    #[test]
    fn test_mismatched_door_rejected() {
        let mut cell = Cell::new(CellId::new(0), Coord::new(0, 0));
        let door = Door::Outside {
            direction: Direction::West,
        };
        assert_eq!(
            cell.add_door(Direction::North, Some(door)),
            Err(MazeError::InvalidDoor {
                slot: Direction::North,
                door: Direction::West,
            })
        );
        assert!(cell.is_unlinked());
    }

    #[test]
    fn test_outside_door_is_not_a_neighbor() {
        let mut cell = Cell::new(CellId::new(0), Coord::new(0, 0));
        cell.add_door(
            Direction::West,
            Some(Door::Outside {
                direction: Direction::West,
            }),
        )
        .unwrap();
        assert_eq!(cell.door_count(), 1);
        assert_eq!(cell.neighbors().count(), 0);
        assert_eq!(cell.real_doors().count(), 0);
    }

    #[test]
    fn test_locks_and_under() {
        let mut over = Cell::new(CellId::new(4), Coord::new(1, 1));
        let under = Cell::new_under(CellId::new(9), &over);
        over.set_under_cell(under.id());
        over.lock_link();
        assert!(over.has_under_cell());
        assert!(under.is_under_cell());
        assert_eq!(under.coord(), over.coord());
        assert!(!over.is_free_to_link());
        assert!(over.is_free_to_use_in_template());
        assert_eq!(under.to_string(), "UnderCell#9(1,1)");
    }
}
