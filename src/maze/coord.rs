use std::fmt;

use crate::error::{MazeError, MazeResult};

/// Compass direction of a door slot.
///
/// The discriminants match the slot order used everywhere: north, east, south, west.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Wraps around, so any index maps onto a direction.
    pub fn from_index(index: usize) -> Direction {
        Self::ALL[index % 4]
    }

    pub fn opposite(self) -> Direction {
        Self::from_index(self.index() + 2)
    }

    /// Counter-clockwise quarter turn.
    pub fn turn_left(self) -> Direction {
        Self::from_index(self.index() + 3)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// The two directions at right angles to this one.
    pub fn perpendicular(self) -> [Direction; 2] {
        if self.is_vertical() {
            [Direction::East, Direction::West]
        } else {
            [Direction::North, Direction::South]
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::North => write!(f, "N"),
            Direction::East => write!(f, "E"),
            Direction::South => write!(f, "S"),
            Direction::West => write!(f, "W"),
        }
    }
}

/// Grid position. `x` is the row (growing south), `y` the column (growing east).
///
/// Coordinates are signed so that stepping off the grid still yields a value
/// that bounds checks can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// The adjacent coordinate in `direction`.
    pub fn step(self, direction: Direction) -> Coord {
        match direction {
            Direction::North => Coord::new(self.x - 1, self.y),
            Direction::East => Coord::new(self.x, self.y + 1),
            Direction::South => Coord::new(self.x + 1, self.y),
            Direction::West => Coord::new(self.x, self.y - 1),
        }
    }

    pub fn shift(self, dx: i32, dy: i32) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }

    /// Direction from `self` to an adjacent `other`.
    ///
    /// # Errors
    /// `MazeError::NotAdjacent` unless the two are exactly one unit apart.
    pub fn direction_to(self, other: Coord) -> MazeResult<Direction> {
        match (other.x - self.x, other.y - self.y) {
            (-1, 0) => Ok(Direction::North),
            (0, 1) => Ok(Direction::East),
            (1, 0) => Ok(Direction::South),
            (0, -1) => Ok(Direction::West),
            _ => Err(MazeError::NotAdjacent {
                from: self,
                to: other,
            }),
        }
    }

    /// Chebyshev (king-move) distance.
    pub fn chebyshev(self, other: Coord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_and_back() {
        let c = Coord::new(3, 4);
        for d in Direction::ALL {
            assert_eq!(c.step(d).step(d.opposite()), c);
            assert_eq!(c.direction_to(c.step(d)), Ok(d));
        }
        assert_eq!(c.step(Direction::North), Coord::new(2, 4));
        assert_eq!(c.step(Direction::East), Coord::new(3, 5));
    }

    #[test]
    fn test_direction_to_not_adjacent() {
        let c = Coord::new(0, 0);
        assert!(matches!(
            c.direction_to(Coord::new(1, 1)),
            Err(MazeError::NotAdjacent { .. })
        ));
        assert!(c.direction_to(c).is_err());
    }

    #[test]
    fn test_turns() {
        assert_eq!(Direction::South.turn_left(), Direction::East);
        assert_eq!(Direction::North.turn_left(), Direction::West);
        assert_eq!(Direction::West.opposite(), Direction::East);
        assert_eq!(Direction::from_index(6), Direction::South);
    }

    #[test]
    fn test_shift() {
        assert_eq!(Coord::new(1, 2).shift(10, 20), Coord::new(11, 22));
        assert_eq!(Coord::new(1, 2).chebyshev(Coord::new(4, 0)), 3);
    }
}
