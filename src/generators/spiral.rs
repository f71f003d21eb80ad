use crate::error::{MazeError, MazeResult};
use crate::maze::{Coord, Direction, Maze};

const VISITED: u32 = 1;

/// A spiral walker: where it stands, where it heads, and which trail it lays.
#[derive(Debug, Clone, Copy)]
struct Walker {
    at: Coord,
    heading: Direction,
    trail: u8,
}

/// One or two walkers sweeping the grid inward.
///
/// `owner` records which walker first reached each cell. A step back onto a walker's
/// own trail would close a loop, so such a step is redirected; entering the other
/// walker's trail joins the two halves and happens once.
struct Spiral {
    walkers: Vec<Walker>,
    owner: Vec<u8>,
    joined: bool,
}

impl Spiral {
    fn new(maze: &mut Maze, walkers: Vec<Walker>) -> MazeResult<Self> {
        maze.color_all(0);
        let mut owner = vec![0; maze.size()];
        for w in &walkers {
            owner[maze.id_at(w.at)?.index()] = w.trail;
        }
        Ok(Spiral {
            walkers,
            owner,
            joined: false,
        })
    }

    fn is_own(&self, maze: &Maze, walker: &Walker, coord: Coord) -> bool {
        match maze.id_at(coord) {
            Ok(id) => {
                let owner = self.owner[id.index()];
                owner != 0 && (self.joined || owner == walker.trail)
            }
            Err(_) => false,
        }
    }

    /// Heading for the next step: turn left when the way ahead leaves the grid, and
    /// once more when it runs into a visited cell.
    fn heading(&self, maze: &mut Maze, walker: &Walker) -> MazeResult<Option<Direction>> {
        maze.set_color(maze.id_at(walker.at)?, VISITED);

        let mut heading = walker.heading;
        if !maze.is_valid_coord(walker.at.step(heading)) {
            heading = heading.turn_left();
        }
        if maze
            .color_at(walker.at.step(heading))
            .is_ok_and(|c| c != 0)
        {
            heading = heading.turn_left();
        }

        let maze = &*maze;
        let ahead = walker.at.step(heading);
        if maze.is_valid_coord(ahead) && !self.is_own(maze, walker, ahead) {
            return Ok(Some(heading));
        }
        let mut candidates = [heading; 4];
        for k in 1..4 {
            candidates[k] = candidates[k - 1].turn_left();
        }
        Ok(candidates.into_iter().find(|&d| {
            let c = walker.at.step(d);
            maze.is_valid_coord(c) && !self.is_own(maze, walker, c)
        }))
    }

    fn advance(&mut self, maze: &mut Maze, turn: usize) -> MazeResult<()> {
        let count = self.walkers.len();
        for index in [turn % count, (turn + 1) % count] {
            let walker = self.walkers[index];
            let Some(heading) = self.heading(maze, &walker)? else {
                continue;
            };
            let next = walker.at.step(heading);
            maze.add_door(walker.at, heading)?;

            let slot = &mut self.owner[maze.id_at(next)?.index()];
            if *slot != 0 && *slot != walker.trail {
                self.joined = true;
            }
            *slot = walker.trail;
            self.walkers[index] = Walker {
                at: next,
                heading,
                ..walker
            };
            return Ok(());
        }
        Err(MazeError::NoFrontier)
    }

    fn run(mut self, maze: &mut Maze) -> MazeResult<()> {
        for turn in 0..maze.size().saturating_sub(1) {
            self.advance(maze, turn)?;
        }
        Ok(())
    }
}

/// Single inward spiral from the north-west corner, heading south first.
///
/// Draws nothing from the maze's rng: the layout depends only on the grid size.
pub fn mono_spiral(maze: &mut Maze) -> MazeResult<()> {
    let walker = Walker {
        at: maze.first_coord(),
        heading: Direction::South,
        trail: 1,
    };
    Spiral::new(maze, vec![walker])?.run(maze)
}

/// Two spirals from opposite corners, advancing in turn until they meet.
///
/// Like [`mono_spiral`] this never touches the rng, so every seed carves the
/// same maze for a given grid size.
pub fn bi_spiral(maze: &mut Maze) -> MazeResult<()> {
    let walkers = vec![
        Walker {
            at: maze.first_coord(),
            heading: Direction::South,
            trail: 1,
        },
        Walker {
            at: maze.last_coord(),
            heading: Direction::North,
            trail: 2,
        },
    ];
    Spiral::new(maze, walkers)?.run(maze)
}
