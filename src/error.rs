use thiserror::Error;

use crate::maze::{Coord, Direction};

/// Everything that can go wrong while building or querying a maze.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    /// Two coordinates were expected to be one unit apart.
    #[error("coordinates {from} and {to} are not adjacent")]
    NotAdjacent { from: Coord, to: Coord },

    #[error("coordinate {coord} is outside the {height}x{width} grid")]
    OutOfBounds {
        coord: Coord,
        height: usize,
        width: usize,
    },

    /// A door may only be stored in the slot matching its own direction.
    #[error("a door facing {door} cannot be stored in the {slot} slot")]
    InvalidDoor { slot: Direction, door: Direction },

    #[error("color {0} is already in use")]
    ColorInUse(u32),

    /// Doors are never overwritten; the slot must be cleared first.
    #[error("cell {coord} already has a door facing {direction}")]
    DoorTaken { coord: Coord, direction: Direction },

    #[error("cell {0} has no doors")]
    DoorlessCell(Coord),

    #[error("disjoint sets have not been initialised for this maze")]
    DisjointSetsMissing,

    #[error("the maze has no generation style")]
    NoStyle,

    #[error("generation is {found}, expected {expected}")]
    PhaseMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// No wall separates two differently colored cells.
    #[error("no frontier wall left to carve")]
    NoFrontier,

    /// Directed carving ran out of legal moves ("end of line").
    #[error("end of line: cannot build from {from} towards {to}")]
    UnreachableGeometry { from: Coord, to: Coord },

    #[error("no path from {from} to {to}")]
    NoPath { from: Coord, to: Coord },

    #[error("unknown maze style '{0}'")]
    UnknownStyle(String),

    #[error("a {height}x{width} grid is too small for the {style} style")]
    TooSmall {
        style: &'static str,
        height: usize,
        width: usize,
    },
}

impl MazeError {
    /// Whether retrying with a different seed may succeed.
    pub fn is_seed_dependent(&self) -> bool {
        matches!(
            self,
            MazeError::UnreachableGeometry { .. } | MazeError::NoPath { .. }
        )
    }
}

pub type MazeResult<T> = Result<T, MazeError>;
