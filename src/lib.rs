//! Procedural maze generation on a rectangular grid.
//!
//! A [`Maze`] is an arena of [`Cell`]s joined by [`Door`]s. Generators in
//! [`generators`] carve the doors, [`solvers`] flood-fill and search the result,
//! and [`geometry`] lays out the straight-line sketches used by the split-tree styles.

pub mod config;
pub mod error;
pub mod generators;
pub mod geometry;
pub mod logging;
pub mod maze;
pub mod solvers;
pub mod text;

pub use config::GeneratorConfig;
pub use error::{MazeError, MazeResult};
pub use generators::{
    LogProgress, ProgressReporter, SilentProgress, Style, StyleChoice, maze_style_names, new_maze,
    new_seeded_maze,
};
pub use maze::{Cell, CellId, Coord, Direction, Door, Maze};
