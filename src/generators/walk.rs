use rand::{Rng, seq::IndexedRandom};

use crate::error::{MazeError, MazeResult};
use crate::generators::Throttle;
use crate::maze::{CellId, Coord, Direction, Maze};

const UNVISITED: u32 = 1;
const VISITED: u32 = 5;

/// Whether a corridor may be dug from `id` toward `direction`: the wall is a
/// frontier wall (see [`Maze::frontier_directions`]).
pub fn can_build(maze: &Maze, id: CellId, direction: Direction) -> bool {
    maze.frontier_directions(id, false).contains(&direction)
}

/// Digs one step from `id`, painting the new cell and threading `prev`/`distance` into it.
pub fn extend_one_step(
    maze: &mut Maze,
    id: CellId,
    direction: Direction,
    color: u32,
) -> MazeResult<CellId> {
    let next = maze.id_at(maze.coord(id).step(direction))?;
    maze.link(id, direction, next)?;
    let distance = maze.distance(id) + 1;
    let scratch = maze.scratch_mut();
    scratch.set_color(next, color);
    scratch.set_prev(next, Some(id));
    scratch.set_distance(next, distance);
    Ok(next)
}

/// A random frontier wall anywhere in the maze, turned so that it leads out of the `color` side.
pub fn pick_new_current(maze: &mut Maze, color: u32) -> MazeResult<(CellId, Direction)> {
    let walls = maze.walls_between_colors();
    let &(coord, direction) = walls.choose(maze.rng()).ok_or(MazeError::NoFrontier)?;
    let near = maze.id_at(coord)?;
    if maze.color(near) == color {
        Ok((near, direction))
    } else {
        Ok((maze.id_at(coord.step(direction))?, direction.opposite()))
    }
}

/// Random walk: carve into a random unvisited neighbor, or jump to a random
/// frontier wall when the current cell is boxed in.
pub fn walk_connect_all(maze: &mut Maze, progress: &mut Throttle) -> MazeResult<()> {
    maze.color_all(UNVISITED);
    let mut current = maze.pick_random_cell();
    let total = maze.size() - 1;
    for done in 0..total {
        progress.tick(done, total);
        maze.set_color(current, VISITED);
        current = match maze.pick_random_bicolor_wall(current) {
            Some(direction) => {
                let coord = maze.coord(current);
                maze.add_door(coord, direction)?;
                maze.id_at(coord.step(direction))?
            }
            None => {
                let (from, direction) = pick_new_current(maze, VISITED)?;
                let coord = maze.coord(from);
                maze.add_door(coord, direction)?;
                maze.id_at(coord.step(direction))?
            }
        };
    }
    Ok(())
}

/// Random run: keep digging straight while possible, and restart from a random
/// frontier wall when blocked.
pub fn run_connect_all(maze: &mut Maze, progress: &mut Throttle) -> MazeResult<()> {
    maze.color_all(UNVISITED);
    let mut current = maze.pick_random_cell();
    maze.set_color(current, VISITED);
    let mut direction = Direction::from_index(maze.rng().random_range(0..4));
    let total = maze.size() - 1;
    for done in 0..total {
        progress.tick(done, total);
        if !can_build(maze, current, direction) {
            (current, direction) = pick_new_current(maze, VISITED)?;
        }
        current = extend_one_step(maze, current, direction, VISITED)?;
    }
    Ok(())
}

/// Walks from `start` across frontier walls, painting with `color`, for at most `limit` cells.
///
/// Returns the coordinates visited, `start` first.
pub fn random_walk(
    maze: &mut Maze,
    start: CellId,
    color: u32,
    limit: usize,
) -> MazeResult<Vec<Coord>> {
    let mut path = vec![maze.coord(start)];
    let mut current = start;
    let scratch = maze.scratch_mut();
    scratch.set_color(start, color);
    scratch.set_prev(start, None);
    scratch.set_distance(start, 0);
    while path.len() < limit {
        let Some(direction) = maze.pick_random_bicolor_wall(current) else {
            break;
        };
        current = extend_one_step(maze, current, direction, color)?;
        path.push(maze.coord(current));
    }
    Ok(path)
}

/// The direction that closes the larger gap toward `goal`, and a second choice
/// that works on the other axis.
pub fn pick_direction_from_to(current: Coord, goal: Coord) -> (Direction, Direction) {
    let dx = goal.x - current.x;
    let dy = goal.y - current.y;
    let along_y = if dy > 0 {
        Direction::East
    } else {
        Direction::West
    };
    let along_x = if dx > 0 {
        Direction::South
    } else {
        Direction::North
    };
    if dx.abs() > dy.abs() {
        (along_x, along_y)
    } else {
        (along_y, along_x)
    }
}

/// Digs a greedy corridor from `from` toward `to`, painting it with `color`.
///
/// When both preferred directions are blocked it takes any frontier wall, backing
/// up along the corridor as needed.
///
/// # Errors
/// `MazeError::UnreachableGeometry` when backing up reaches `from` with no way forward.
pub fn build_from_to(maze: &mut Maze, from: Coord, to: Coord, color: u32) -> MazeResult<()> {
    let mut current = maze.id_at(from)?;
    maze.id_at(to)?;
    let scratch = maze.scratch_mut();
    scratch.set_color(current, color);
    scratch.set_prev(current, None);
    scratch.set_distance(current, 0);

    while maze.coord(current) != to {
        let here = maze.coord(current);
        let (first, second) = pick_direction_from_to(here, to);
        let direction = if can_build(maze, current, first) {
            first
        } else if here.step(first) == to {
            if !maze.cell(current).has_door(first) {
                maze.add_door(here, first)?;
            }
            return Ok(());
        } else if can_build(maze, current, second) {
            second
        } else {
            loop {
                if let Some(direction) = maze.pick_random_bicolor_wall(current) {
                    break direction;
                }
                current = maze
                    .prev(current)
                    .ok_or(MazeError::UnreachableGeometry { from, to })?;
                tracing::trace!("[build] backing up to {}", maze.coord(current));
            }
        };
        current = extend_one_step(maze, current, direction, color)?;
    }
    Ok(())
}
