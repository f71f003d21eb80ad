use rand::Rng;

use crate::error::{MazeError, MazeResult};
use crate::generators::Throttle;
use crate::generators::split_tree::{PathQueue, SPINE, build_path};
use crate::generators::weave::tunnel_under;
use crate::geometry::{Line, LineLikeCollection, PointSketch};
use crate::maze::{Coord, Direction, Maze};

const SKETCH_COLOR: u32 = 7;
/// Closest a sketch endpoint may come to an unrelated line, in cells
const NUDGE_GAP: f64 = 2.0;

/// Carves a crossing at `coord` without union-find bookkeeping: a corridor
/// through it on a random axis, painted `color`, and a tunnel beneath on the other.
pub fn add_cross(maze: &mut Maze, coord: Coord, color: u32) -> MazeResult<()> {
    let center = maze.id_at(coord)?;
    maze.set_color(center, color);
    let axis = if maze.rng().random_bool(0.5) {
        [Direction::East, Direction::West]
    } else {
        [Direction::North, Direction::South]
    };
    for direction in axis {
        maze.add_door(coord, direction)?;
        let arm = maze.id_at(coord.step(direction))?;
        maze.set_color(arm, color);
    }
    tunnel_under(maze, coord)?;
    Ok(())
}

/// Routes `line` through doorless cells and carves it. Gives `None` when the
/// endpoints are already connected.
fn route_line(maze: &mut Maze, line: &Line, color: u32) -> MazeResult<Option<Vec<Coord>>> {
    let start = maze.id_at(line.p1.coord())?;
    let stop = maze.id_at(line.p2.coord())?;
    if start == stop || maze.is_reachable(start, stop) {
        return Ok(None);
    }
    let path: Vec<Coord> = maze
        .shortest_unlinked_path(start, stop)?
        .into_iter()
        .map(|id| maze.coord(id))
        .collect();
    build_path(maze, &path, color)?;
    Ok(Some(path))
}

/// First phase of the line-sketch variant.
///
/// A polyline through random interior points is uncrossed into lines and
/// crossings. The crossings are carved first, then every line is routed around
/// what is already there. The queue holds the routed pieces, and the whole spine ends
/// up painted with the branch color.
pub fn split_tree_v3(maze: &mut Maze, progress: &mut Throttle) -> MazeResult<PathQueue> {
    let (height, width) = (maze.height(), maze.width());
    if height < 3 || width < 3 {
        return Err(MazeError::TooSmall {
            style: "split_tree_v3",
            height,
            width,
        });
    }
    let config = maze.config().clone();
    let sketch = PointSketch::random(height, width, config.sketch_points, maze.rng());
    let mut items = LineLikeCollection::from_lines(sketch.lines());
    let mut nudged = items.nudge(height, width, NUDGE_GAP);
    let resolved = items.uncross(height, width, config.uncross_rounds);
    nudged += items.nudge(height, width, NUDGE_GAP);
    tracing::debug!(
        "[split_tree] sketch of {} points, {nudged} endpoints nudged, {resolved} crossings resolved into {} items",
        sketch.points().len(),
        items.len()
    );

    maze.color_all(0);
    for cross in items.crosses() {
        add_cross(maze, cross.coord(), SKETCH_COLOR)?;
    }

    let lines: Vec<Line> = items.lines().copied().collect();
    let mut queue = PathQueue::new(maze.size());
    for (done, line) in lines.iter().enumerate() {
        progress.tick(done, lines.len());
        match route_line(maze, line, SKETCH_COLOR)? {
            Some(path) => queue.push(path),
            None => {
                // Endpoints are still worth branching from
                tracing::trace!("[split_tree] {line} already connected");
                queue.push(vec![line.p1.coord()]);
                queue.push(vec![line.p2.coord()]);
            }
        }
    }

    maze.color_all(0);
    maze.color_from(SPINE, maze.first_coord())?;
    Ok(queue)
}
