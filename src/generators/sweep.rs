use crate::error::MazeResult;
use crate::maze::{Coord, Direction, Maze};

/// Boustrophedon sweep by rows: every row becomes an east-west corridor and
/// alternating row ends are joined, giving one Hamiltonian path.
pub fn zigzag(maze: &mut Maze) -> MazeResult<()> {
    let (height, width) = (maze.height() as i32, maze.width() as i32);
    for x in 0..height {
        for y in 0..width - 1 {
            maze.add_door(Coord::new(x, y), Direction::East)?;
        }
    }
    let mut right = true;
    for x in 0..height - 1 {
        let y = if right { width - 1 } else { 0 };
        maze.add_door(Coord::new(x, y), Direction::South)?;
        right = !right;
    }
    Ok(())
}

/// [`zigzag`] by columns.
pub fn zagzig(maze: &mut Maze) -> MazeResult<()> {
    let (height, width) = (maze.height() as i32, maze.width() as i32);
    for y in 0..width {
        for x in 0..height - 1 {
            maze.add_door(Coord::new(x, y), Direction::South)?;
        }
    }
    let mut bottom = true;
    for y in 0..width - 1 {
        let x = if bottom { height - 1 } else { 0 };
        maze.add_door(Coord::new(x, y), Direction::East)?;
        bottom = !bottom;
    }
    Ok(())
}
