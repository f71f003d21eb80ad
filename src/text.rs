//! Plain-text rendering of a carved maze.

use std::collections::HashSet;
use std::fmt;
use std::io::Write;

use crossterm::{
    QueueableCommand,
    style::{self, Attribute, Color, StyledContent, Stylize},
};

use crate::maze::{Cell, CellId, Coord, Direction, Maze};

/// What a cell body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    Empty,
    Route,
    /// The surface corridor runs east-west over a tunnel
    CrossingEastWest,
    /// The surface corridor runs north-south over a tunnel
    CrossingNorthSouth,
}

impl Body {
    fn symbol(self, on_route: bool) -> StyledContent<&'static str> {
        let styled = match self {
            Body::Empty => "  ".with(Color::Reset),
            Body::Route => "**".with(Color::Yellow),
            Body::CrossingEastWest => "==".with(Color::Cyan),
            Body::CrossingNorthSouth => "||".with(Color::Cyan),
        };
        let styled = if on_route && self != Body::Route {
            styled.with(Color::Yellow)
        } else {
            styled
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled.content().width(),
                TextView::BODY_WIDTH,
                "Each cell body must occupy exactly two character widths."
            );
        }

        styled
    }
}

/// Draws a maze as `+--+` boxes, one row of text per row of cells plus the walls between them.
///
/// Crossings show the direction of the surface corridor. An optional solution
/// is drawn over the route it takes.
pub struct TextView<'a> {
    maze: &'a Maze,
    route: HashSet<Coord>,
    color: bool,
}

impl<'a> TextView<'a> {
    /// The width of each cell body, in character widths.
    pub const BODY_WIDTH: usize = 2;

    pub fn new(maze: &'a Maze) -> Self {
        Self {
            maze,
            route: HashSet::new(),
            color: false,
        }
    }

    /// Marks every cell of `path` as part of the solution.
    pub fn with_solution(mut self, path: &[CellId]) -> Self {
        self.route = path.iter().map(|&id| self.maze.coord(id)).collect();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// The surface cell at `coord`, read straight from the row-major surface slice.
    ///
    /// Every caller walks `0..height` by `0..width`, so `coord` is always on the grid.
    fn surface(&self, coord: Coord) -> &Cell {
        debug_assert!(self.maze.is_valid_coord(coord), "{coord} is off the grid");
        &self.maze.surface_cells()[coord.x as usize * self.maze.width() + coord.y as usize]
    }

    /// Whether the wall on side `direction` of `coord` has a door through it, above or below.
    fn is_open(&self, coord: Coord, direction: Direction) -> bool {
        let cell = self.surface(coord);
        cell.has_door(direction)
            || cell
                .under_cell()
                .is_some_and(|under| self.maze.cell(under).has_door(direction))
    }

    fn body(&self, coord: Coord) -> StyledContent<&'static str> {
        let cell = self.surface(coord);
        let on_route = self.route.contains(&coord);
        let body = if cell.has_under_cell() {
            if cell.has_door(Direction::East) || cell.has_door(Direction::West) {
                Body::CrossingEastWest
            } else {
                Body::CrossingNorthSouth
            }
        } else if on_route {
            Body::Route
        } else {
            Body::Empty
        };
        body.symbol(on_route)
    }

    /// The horizontal wall line above row `x`, or below the last row when `x == height`.
    fn wall_line(&self, x: usize) -> String {
        let (height, width) = (self.maze.height(), self.maze.width());
        let mut line = String::with_capacity(width * (Self::BODY_WIDTH + 1) + 1);
        for y in 0..width {
            let open = if x < height {
                self.is_open(Coord::new(x as i32, y as i32), Direction::North)
            } else {
                self.is_open(Coord::new(x as i32 - 1, y as i32), Direction::South)
            };
            line.push('+');
            line.push_str(if open { "  " } else { "--" });
        }
        line.push('+');
        line
    }

    fn side(&self, coord: Coord, direction: Direction) -> &'static str {
        if self.is_open(coord, direction) { " " } else { "|" }
    }

    /// Queues the whole view on `out` with styled cell bodies, then flushes.
    pub fn queue_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let (height, width) = (self.maze.height(), self.maze.width());
        for x in 0..height {
            out.queue(style::Print(self.wall_line(x)))?;
            out.queue(style::Print("\n"))?;
            for y in 0..width {
                let coord = Coord::new(x as i32, y as i32);
                out.queue(style::Print(self.side(coord, Direction::West)))?;
                let body = self.body(coord);
                if self.color {
                    out.queue(style::PrintStyledContent(body.attribute(Attribute::Bold)))?;
                } else {
                    out.queue(style::Print(*body.content()))?;
                }
                if y + 1 == width {
                    out.queue(style::Print(self.side(coord, Direction::East)))?;
                }
            }
            out.queue(style::Print("\n"))?;
        }
        out.queue(style::Print(self.wall_line(height)))?;
        out.queue(style::Print("\n"))?;
        out.flush()
    }
}

impl fmt::Display for TextView<'_> {
    /// The unstyled view, regardless of [`TextView::with_color`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (height, width) = (self.maze.height(), self.maze.width());
        for x in 0..height {
            writeln!(f, "{}", self.wall_line(x))?;
            for y in 0..width {
                let coord = Coord::new(x as i32, y as i32);
                write!(f, "{}{}", self.side(coord, Direction::West), self.body(coord).content())?;
            }
            writeln!(
                f,
                "{}",
                self.side(Coord::new(x as i32, width as i32 - 1), Direction::East)
            )?;
        }
        writeln!(f, "{}", self.wall_line(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_row() {
        let mut maze = Maze::with_seed(1, 3, "T", 1);
        maze.add_door(Coord::new(0, 0), Direction::East).unwrap();
        maze.add_door(Coord::new(0, 1), Direction::East).unwrap();
        maze.open_outer_walls().unwrap();
        assert_eq!(
            TextView::new(&maze).to_string(),
            "+--+--+--+\n          \n+--+--+--+\n"
        );
    }

    #[test]
    fn test_render_solution() {
        let mut maze = Maze::with_seed(2, 2, "T", 1);
        maze.add_door(Coord::new(0, 0), Direction::East).unwrap();
        maze.add_door(Coord::new(0, 1), Direction::South).unwrap();
        maze.add_door(Coord::new(1, 1), Direction::West).unwrap();
        let path = maze.solve(3).unwrap();
        let view = TextView::new(&maze).with_solution(&path);
        assert_eq!(
            view.to_string(),
            "+--+--+\n|** **|\n+--+  +\n|   **|\n+--+--+\n"
        );
    }

    #[test]
    fn test_render_crossing() {
        let mut maze = Maze::with_seed(3, 3, "T", 1);
        maze.add_door(Coord::new(1, 1), Direction::East).unwrap();
        maze.add_door(Coord::new(1, 1), Direction::West).unwrap();
        crate::generators::weave::tunnel_under(&mut maze, Coord::new(1, 1)).unwrap();
        let text = TextView::new(&maze).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[2], "+--+  +--+");
        assert_eq!(lines[3], "|   ==   |");
        assert_eq!(lines[4], "+--+  +--+");
    }

    #[test]
    fn test_queue_matches_display() {
        let mut maze = Maze::with_seed(4, 5, "T", 8);
        maze.connect_all(
            crate::generators::StyleChoice::Fixed(crate::generators::Style::Kruskal),
            &mut crate::generators::SilentProgress,
        )
        .unwrap();
        let view = TextView::new(&maze);
        let mut out = Vec::new();
        view.queue_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), view.to_string());
    }

    #[test]
    fn test_surface_matches_lookup() {
        let maze = Maze::with_seed(3, 5, "T", 1);
        let view = TextView::new(&maze);
        for coord in maze.coords() {
            assert_eq!(view.surface(coord).id(), maze.get(coord).unwrap().id());
        }
    }
}
