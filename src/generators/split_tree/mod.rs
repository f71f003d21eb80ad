//! Split-tree mazes: one long spine corridor, branched over and over.
//!
//! The first phase carves a spine and queues it. The second phase pops the
//! longest queued piece, cuts it at the junction nearest its middle, grows a
//! random walk from there and queues all three parts, until nothing is left to split.

mod planner;
mod queue;
mod sketch;

pub use planner::GridPathPlanner;
pub use queue::PathQueue;
pub use sketch::{add_cross, split_tree_v3};

use rand::Rng;

use crate::error::{MazeError, MazeResult};
use crate::generators::Throttle;
use crate::generators::walk::random_walk;
use crate::maze::{Coord, Maze};

/// Color of every cell already on the spine or one of its branches.
pub(crate) const SPINE: u32 = 8;

/// Carves `path` as a corridor, painting each of its cells `color`.
pub fn build_path(maze: &mut Maze, path: &[Coord], color: u32) -> MazeResult<()> {
    for pair in path.windows(2) {
        maze.add_door(pair[0], pair[0].direction_to(pair[1])?)?;
    }
    for &coord in path {
        let id = maze.id_at(coord)?;
        maze.set_color(id, color);
    }
    Ok(())
}

/// Whether a branch could leave `coord`: some wall without a door leads to a
/// cell of another color.
pub fn has_junction(maze: &Maze, coord: Coord) -> MazeResult<bool> {
    let id = maze.id_at(coord)?;
    Ok(!maze.frontier_directions(id, false).is_empty())
}

/// Index of the junction closest to the middle of `path`, looking below the
/// middle before above it at each distance.
pub fn junction_nearest_middle(maze: &Maze, path: &[Coord]) -> MazeResult<Option<usize>> {
    if path.is_empty() {
        return Ok(None);
    }
    let middle = path.len() / 2;
    if has_junction(maze, path[middle])? {
        return Ok(Some(middle));
    }
    for offset in 1..=middle.max(path.len() - middle) {
        if let Some(lower) = middle.checked_sub(offset)
            && has_junction(maze, path[lower])?
        {
            return Ok(Some(lower));
        }
        if let Some(&upper) = path.get(middle + offset)
            && has_junction(maze, upper)?
        {
            return Ok(Some(middle + offset));
        }
    }
    Ok(None)
}

/// A path cut at its middle junction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub before: Vec<Coord>,
    pub junction: Coord,
    pub after: Vec<Coord>,
}

/// Cuts `path` at [`junction_nearest_middle`], or gives `None` when no cell of it can branch.
pub fn divide_path_at_junction_near_middle(
    maze: &Maze,
    mut path: Vec<Coord>,
) -> MazeResult<Option<Division>> {
    let Some(m) = junction_nearest_middle(maze, &path)? else {
        return Ok(None);
    };
    let after = path.split_off(m + 1);
    let junction = path.pop().ok_or(MazeError::NoFrontier)?;
    Ok(Some(Division {
        before: path,
        junction,
        after,
    }))
}

/// One refinement step. Returns how many cells the new branch added.
pub fn split_tree_more(maze: &mut Maze, queue: &mut PathQueue) -> MazeResult<usize> {
    let Some(path) = queue.pop() else {
        return Ok(0);
    };
    let Some(division) = divide_path_at_junction_near_middle(maze, path)? else {
        return Ok(0);
    };
    let start = maze.id_at(division.junction)?;
    let limit = maze.config().branch_limit;
    let branch = random_walk(maze, start, SPINE, limit)?;
    let added = branch.len() - 1;
    for piece in [division.before, division.after, branch] {
        if !piece.is_empty() {
            queue.push(piece);
        }
    }
    Ok(added)
}

/// Second phase: refines until the queue runs dry.
pub fn split_tree_again(
    maze: &mut Maze,
    mut queue: PathQueue,
    progress: &mut Throttle,
) -> MazeResult<()> {
    let total = maze.size();
    let mut done = maze.all_with_color(SPINE).len();
    let mut rounds = 0usize;
    while !queue.is_empty() {
        progress.tick(done, total);
        done += split_tree_more(maze, &mut queue)?;
        rounds += 1;
    }
    tracing::debug!("[split_tree] {rounds} refinements covered {done}/{total} cells");
    Ok(())
}

/// First phase shared by the grid-of-mazes variants: plans, carves and queues the spine.
pub fn split_tree(
    maze: &mut Maze,
    grid_x: usize,
    grid_y: usize,
    sub_x: usize,
    sub_y: usize,
) -> MazeResult<PathQueue> {
    let seed = maze.rng().random();
    let path = GridPathPlanner::new(grid_x, grid_y, sub_x, sub_y, seed).make_path()?;
    tracing::debug!(
        "[split_tree] spine of {} cells through {grid_x}x{grid_y} blocks of {sub_x}x{sub_y}",
        path.len()
    );
    maze.color_all(0);
    build_path(maze, &path, SPINE)?;
    let mut queue = PathQueue::new(maze.size());
    queue.push(path);
    Ok(queue)
}

fn block_layout(maze: &Maze, style: &'static str) -> MazeResult<(usize, usize, usize)> {
    let factor = maze.config().block_factor.max(1);
    let (blocks_x, blocks_y) = (maze.height() / factor, maze.width() / factor);
    if blocks_x == 0 || blocks_y == 0 {
        return Err(MazeError::TooSmall {
            style,
            height: maze.height(),
            width: maze.width(),
        });
    }
    Ok((factor, blocks_x, blocks_y))
}

/// A fixed grid of blocks, each a fifth of the maze on a side.
pub fn split_tree_v1(maze: &mut Maze) -> MazeResult<PathQueue> {
    let (factor, sub_x, sub_y) = block_layout(maze, "split_tree")?;
    split_tree(maze, factor, factor, sub_x, sub_y)
}

/// Many small blocks of a fixed size.
pub fn split_tree_v2(maze: &mut Maze) -> MazeResult<PathQueue> {
    let (factor, grid_x, grid_y) = block_layout(maze, "split_tree_v2")?;
    split_tree(maze, grid_x, grid_y, factor, factor)
}
