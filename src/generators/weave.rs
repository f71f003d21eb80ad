//! Over/under crossings and the Kruskal template family.
//!
//! Templates are stamped into a maze whose union-find sets are live, so every
//! door they carve keeps the forest a forest. A terminal [`join_all`] pass
//! (the second phase of the two-part styles) connects whatever is left.

use rand::{Rng, seq::IndexedRandom};

use crate::error::MazeResult;
use crate::generators::Throttle;
use crate::generators::kruskal::{can_join, join, join_all};
use crate::maze::{CellId, Coord, Direction, Maze};

const TEMPLATE_COLOR: u32 = 2;

/// Whether the `(2*delta+1)`-square around `coord` lies on the grid and is free for templates.
pub fn template_check_box(maze: &Maze, coord: Coord, delta: i32) -> bool {
    (-delta..=delta).all(|dx| {
        (-delta..=delta).all(|dy| {
            maze.get(coord.shift(dx, dy))
                .is_ok_and(|cell| cell.is_free_to_use_in_template())
        })
    })
}

/// Locks every on-grid cell of the square around `coord` against further templates.
pub fn template_lock_box(maze: &mut Maze, coord: Coord, delta: i32) {
    for dx in -delta..=delta {
        for dy in -delta..=delta {
            if let Ok(id) = maze.id_at(coord.shift(dx, dy)) {
                maze.cell_mut(id).lock_template();
            }
        }
    }
}

/// The pair of directions a tunnel under `coord` takes: across whatever corridor
/// already runs over it.
fn tunnel_axis(maze: &Maze, coord: Coord) -> MazeResult<(Direction, Direction)> {
    if maze.get(coord)?.has_door(Direction::North) {
        Ok((Direction::East, Direction::West))
    } else {
        Ok((Direction::North, Direction::South))
    }
}

/// Digs an under cell beneath `coord`, opening it to the two neighbors across
/// the over corridor. Returns the under cell.
pub fn tunnel_under(maze: &mut Maze, coord: Coord) -> MazeResult<CellId> {
    let (first, second) = tunnel_axis(maze, coord)?;
    let under = maze.create_under_cell(coord)?;
    maze.add_under_door(under, first)?;
    maze.add_under_door(under, second)?;
    tracing::trace!("[weave] tunnel under {coord} heading {first}{second}");
    Ok(under)
}

/// [`tunnel_under`] for a maze with live sets: locks the crossing and merges the
/// sets on both ends of the tunnel.
fn kruskal_tunnel_under(maze: &mut Maze, coord: Coord) -> MazeResult<()> {
    let (first, second) = tunnel_axis(maze, coord)?;
    let over = maze.id_at(coord)?;
    let under = tunnel_under(maze, coord)?;
    for id in [over, under] {
        let cell = maze.cell_mut(id);
        cell.lock_link();
        cell.lock_template();
    }
    let a = maze.id_at(coord.step(first))?;
    let b = maze.id_at(coord.step(second))?;
    maze.cell_mut(a).lock_template();
    maze.cell_mut(b).lock_template();
    maze.disjoint_sets_mut()?.join(a, b);
    Ok(())
}

/// Stamps a crossing centered on `coord`: a straight corridor over it on a
/// random axis and a tunnel under it on the other.
///
/// Returns false, changing nothing, unless the 3x3 box around `coord` is on the
/// grid and free for templates.
pub fn over_under_cross(maze: &mut Maze, coord: Coord) -> MazeResult<bool> {
    if !template_check_box(maze, coord, 1) {
        return Ok(false);
    }
    let axis = if maze.rng().random_bool(0.5) {
        [Direction::East, Direction::West]
    } else {
        [Direction::North, Direction::South]
    };
    let center = maze.id_at(coord)?;
    for direction in axis {
        let next = maze.id_at(coord.step(direction))?;
        maze.cell_mut(next).lock_template();
        join(maze, center, direction, next)?;
    }
    kruskal_tunnel_under(maze, coord)?;
    template_lock_box(maze, coord, 1);
    tracing::trace!("[weave] cross at {coord}");
    Ok(true)
}

/// Kruskal with up to `weave_count` crossings stamped at random before the global join.
pub fn kruskal_weave(maze: &mut Maze, weave_count: usize, progress: &mut Throttle) -> MazeResult<()> {
    maze.init_disjoint_sets();
    let mut placed = 0;
    for _ in 0..weave_count {
        let coord = maze.pick_random_coord();
        if over_under_cross(maze, coord)? {
            placed += 1;
        }
    }
    tracing::debug!("[weave] placed {placed} of {weave_count} crossings");
    join_all(maze, progress)
}

/// Which walls a templated walk may cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkKind {
    /// Any frontier wall, nothing locked
    Free,
    /// Unlocked frontier walls only; the walk locks what it visits
    Locked,
}

fn kruskal_walk_with(
    maze: &mut Maze,
    start: CellId,
    color: u32,
    limit: usize,
    kind: WalkKind,
) -> MazeResult<Vec<Coord>> {
    let locked = kind == WalkKind::Locked;
    let pick = |maze: &mut Maze, id| {
        if locked {
            maze.pick_random_bicolor_unlocked_wall(id)
        } else {
            maze.pick_random_bicolor_wall(id)
        }
    };

    let mut path = vec![maze.coord(start)];
    let mut current = start;
    maze.set_color(current, color);
    if locked {
        maze.cell_mut(current).lock_template();
    }
    let mut attempts = 0;
    let mut direction = pick(maze, current);
    while let Some(d) = direction
        && path.len() < limit
        && attempts < 2 * limit
    {
        attempts += 1;
        let next = maze.id_at(maze.coord(current).step(d))?;
        if can_join(maze, current, next)? {
            join(maze, current, d, next)?;
            let scratch = maze.scratch_mut();
            scratch.set_color(next, color);
            scratch.set_distance(next, path.len());
            scratch.set_prev(next, Some(current));
            if locked {
                maze.cell_mut(next).lock_template();
            }
            current = next;
            path.push(maze.coord(next));
        }
        direction = pick(maze, current);
    }
    if locked {
        lock_interior(maze, &path)?;
    }
    Ok(path)
}

/// Link-locks every cell of `path` except the first and the last two.
fn lock_interior(maze: &mut Maze, path: &[Coord]) -> MazeResult<()> {
    let interior = path.get(1..path.len().saturating_sub(2)).unwrap_or(&[]);
    for &coord in interior {
        let id = maze.id_at(coord)?;
        maze.cell_mut(id).lock_link();
    }
    Ok(())
}

/// A random walk that only carves doors the union-find allows, giving up after
/// `2 * limit` attempts.
pub fn kruskal_walk(
    maze: &mut Maze,
    start: CellId,
    color: u32,
    limit: usize,
) -> MazeResult<Vec<Coord>> {
    kruskal_walk_with(maze, start, color, limit, WalkKind::Free)
}

/// [`kruskal_walk`] that avoids locked cells, template-locks its trail and link-locks its interior.
pub fn kruskal_walk2(
    maze: &mut Maze,
    start: CellId,
    color: u32,
    limit: usize,
) -> MazeResult<Vec<Coord>> {
    kruskal_walk_with(maze, start, color, limit, WalkKind::Locked)
}

/// A straight run in one random unlocked direction, stopping at the first cell it may not join.
pub fn kruskal_run(
    maze: &mut Maze,
    start: CellId,
    color: u32,
    limit: usize,
) -> MazeResult<Vec<Coord>> {
    let mut path = vec![maze.coord(start)];
    let mut current = start;
    maze.set_color(current, color);
    maze.cell_mut(current).lock_template();
    let Some(direction) = maze.pick_random_bicolor_unlocked_wall(current) else {
        return Ok(path);
    };
    while path.len() < limit {
        let Ok(next) = maze.id_at(maze.coord(current).step(direction)) else {
            break;
        };
        if maze.color(current) == maze.color(next)
            || !maze.cell(next).is_free_to_use_in_template()
            || !can_join(maze, current, next)?
        {
            break;
        }
        join(maze, current, direction, next)?;
        let scratch = maze.scratch_mut();
        scratch.set_color(next, color);
        scratch.set_distance(next, path.len());
        scratch.set_prev(next, Some(current));
        maze.cell_mut(next).lock_template();
        current = next;
        path.push(maze.coord(next));
    }
    lock_interior(maze, &path)?;
    Ok(path)
}

/// Joins `coord` to its neighbor in `direction` when the sets allow, marking the neighbor.
fn join_from(
    maze: &mut Maze,
    coord: Coord,
    direction: Direction,
    color: u32,
    lock_link: bool,
) -> MazeResult<()> {
    let current = maze.id_at(coord)?;
    let next = maze.id_at(coord.step(direction))?;
    if can_join(maze, current, next)? {
        join(maze, current, direction, next)?;
        maze.set_color(next, color);
        let cell = maze.cell_mut(next);
        cell.lock_template();
        if lock_link {
            cell.lock_link();
        }
    }
    Ok(())
}

/// Stamps two nested corners into the 3x3 box around `coord`: an outer one
/// through the north-west cell, which gets link-locked, and an inner one through `coord`.
pub fn kruskal_corner(maze: &mut Maze, coord: Coord, color: u32) -> MazeResult<bool> {
    if !template_check_box(maze, coord, 1) {
        return Ok(false);
    }
    let center = maze.id_at(coord)?;
    maze.set_color(center, color);
    maze.cell_mut(center).lock_template();
    join_from(maze, coord, Direction::East, color, false)?;
    join_from(maze, coord, Direction::South, color, false)?;

    let corner = coord.step(Direction::North).step(Direction::West);
    join_from(maze, corner.step(Direction::East), Direction::East, color, false)?;
    join_from(maze, corner.step(Direction::South), Direction::South, color, false)?;
    join_from(maze, corner, Direction::East, color, true)?;
    join_from(maze, corner, Direction::South, color, true)?;
    Ok(true)
}

/// A random surface coordinate still free for templates, if any is left.
fn pick_random_unlocked_coord(maze: &mut Maze) -> Option<Coord> {
    let free: Vec<Coord> = maze
        .surface_cells()
        .iter()
        .filter(|c| c.is_free_to_use_in_template())
        .map(|c| c.coord())
        .collect();
    free.choose(maze.rng()).copied()
}

fn start_templates(maze: &mut Maze) {
    maze.init_disjoint_sets();
    maze.color_all(1);
}

/// First phase of `kruskal_walk`: free walks from random cells.
pub fn kruskal_with_walks(maze: &mut Maze) -> MazeResult<()> {
    start_templates(maze);
    let (count, limit) = (maze.config().template_count, maze.config().walk_limit);
    for _ in 0..count {
        let start = maze.pick_random_cell();
        kruskal_walk(maze, start, TEMPLATE_COLOR, limit)?;
    }
    tracing::debug!("[template] {count} walks stamped");
    Ok(())
}

/// First phase of `kruskal_walk2`: locked walks from random cells.
pub fn kruskal_with_walks2(maze: &mut Maze) -> MazeResult<()> {
    start_templates(maze);
    let (count, limit) = (maze.config().template_count, maze.config().walk_limit);
    for _ in 0..count {
        let start = maze.pick_random_cell();
        kruskal_walk2(maze, start, TEMPLATE_COLOR, limit)?;
    }
    tracing::debug!("[template] {count} locked walks stamped");
    Ok(())
}

/// First phase of `random_template`: a random mix of crossings, locked walks,
/// runs and corners at unlocked cells.
pub fn random_templates(maze: &mut Maze) -> MazeResult<()> {
    start_templates(maze);
    let config = maze.config().clone();
    let mut stamped = [0usize; 4];
    for _ in 0..config.template_count {
        let Some(coord) = pick_random_unlocked_coord(maze) else {
            tracing::debug!("[template] every cell is locked");
            break;
        };
        let id = maze.id_at(coord)?;
        let kind = maze.rng().random_range(0..4);
        match kind {
            0 => {
                over_under_cross(maze, coord)?;
            }
            1 => {
                kruskal_walk2(maze, id, TEMPLATE_COLOR, config.walk_limit)?;
            }
            2 => {
                kruskal_run(maze, id, TEMPLATE_COLOR, config.run_limit)?;
            }
            _ => {
                kruskal_corner(maze, coord, TEMPLATE_COLOR)?;
            }
        }
        stamped[kind] += 1;
    }
    tracing::debug!(
        "[template] crosses {}, walks {}, runs {}, corners {}",
        stamped[0],
        stamped[1],
        stamped[2],
        stamped[3]
    );
    Ok(())
}
