use std::fmt;

use crate::geometry::{EPSILON, Line, Point};
use crate::maze::{Coord, Direction};

/// A planned crossing: a plus sign one cell out in each direction from its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cross {
    at: Coord,
}

impl Cross {
    pub fn new(at: Coord) -> Self {
        Cross { at }
    }

    pub fn coord(&self) -> Coord {
        self.at
    }

    /// The east-west bar, then the north-south bar.
    pub fn lines(&self) -> [Line; 2] {
        let Coord { x, y } = self.at;
        let point = |x: i32, y: i32| Point::new(x.into(), y.into());
        [
            Line::new(point(x, y - 1), point(x, y + 1)),
            Line::new(point(x - 1, y), point(x + 1, y)),
        ]
    }

    pub fn intersects_line(&self, line: &Line) -> bool {
        self.lines().iter().any(|bar| line.intersects(bar))
    }

    pub fn intersects_cross(&self, other: &Cross) -> bool {
        let theirs = other.lines();
        self.lines()
            .iter()
            .any(|bar| theirs.iter().any(|other| bar.intersects(other)))
    }
}

/// Either kind of item in a sketch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineLike {
    Line(Line),
    Cross(Cross),
}

impl LineLike {
    pub fn is_cross(&self) -> bool {
        matches!(self, LineLike::Cross(_))
    }

    pub fn intersects(&self, other: &LineLike) -> bool {
        match (self, other) {
            (LineLike::Line(a), LineLike::Line(b)) => a.intersects(b),
            (LineLike::Line(line), LineLike::Cross(cross))
            | (LineLike::Cross(cross), LineLike::Line(line)) => cross.intersects_line(line),
            (LineLike::Cross(a), LineLike::Cross(b)) => a.intersects_cross(b),
        }
    }
}

impl fmt::Display for LineLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineLike::Line(line) => write!(f, "{line}"),
            LineLike::Cross(cross) => write!(f, "Cross{}", cross.coord()),
        }
    }
}

/// The lines and crossings of a sketch, in routing order.
#[derive(Debug, Clone, Default)]
pub struct LineLikeCollection {
    items: Vec<LineLike>,
}

impl LineLikeCollection {
    pub fn new(items: Vec<LineLike>) -> Self {
        LineLikeCollection { items }
    }

    pub fn from_lines(lines: impl IntoIterator<Item = Line>) -> Self {
        Self::new(lines.into_iter().map(LineLike::Line).collect())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[LineLike] {
        &self.items
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.items.iter().filter_map(|item| match item {
            LineLike::Line(line) => Some(line),
            LineLike::Cross(_) => None,
        })
    }

    pub fn crosses(&self) -> impl Iterator<Item = &Cross> {
        self.items.iter().filter_map(|item| match item {
            LineLike::Cross(cross) => Some(cross),
            LineLike::Line(_) => None,
        })
    }

    /// Removes and returns the first intersecting pair, in collection order.
    pub fn crossing(&mut self) -> Option<(LineLike, LineLike)> {
        let n = self.items.len();
        let (i, j) = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .find(|&(i, j)| self.items[i].intersects(&self.items[j]))?;
        let b = self.items.remove(j);
        let a = self.items.remove(i);
        Some((a, b))
    }

    /// Replaces line crossings with [`Cross`]es on a `height`x`width` grid, at most `rounds` times.
    ///
    /// Each crossing pair becomes a cross at the rounded crossing point plus four
    /// shorter lines, each ending on one arm of the cross. A crossing is only
    /// resolved where the cross fits: strictly inside the grid, at Chebyshev
    /// distance 3 or more from every other cross and 2 or more from every line endpoint.
    ///
    /// Returns how many crossings were resolved.
    pub fn uncross(&mut self, height: usize, width: usize, rounds: usize) -> usize {
        let mut resolved = 0;
        while resolved < rounds {
            let Some((i, j, site)) = self.next_resolvable(height, width) else {
                break;
            };
            let (LineLike::Line(second), LineLike::Line(first)) =
                (self.items.remove(j), self.items.remove(i))
            else {
                break;
            };
            let first_axis = dominant_axis(&first);
            let second_axis = other_axis(first_axis);
            self.items.push(LineLike::Cross(Cross::new(site)));
            for (line, axis) in [(first, first_axis), (second, second_axis)] {
                let (near, far) = arms(site, &line, axis);
                self.items
                    .push(LineLike::Line(Line::new(line.p1, Point::from(near))));
                self.items
                    .push(LineLike::Line(Line::new(Point::from(far), line.p2)));
            }
            tracing::trace!("[sketch] crossing of {first} and {second} resolved at {site}");
            resolved += 1;
        }
        resolved
    }

    /// Pulls apart lines that nearly touch, on a `height`x`width` grid.
    ///
    /// An endpoint closer than `gap` to a line it neither meets nor shares an
    /// endpoint with is pushed straight away from that line until it is `gap`
    /// off. Every line ending at that point moves with it. Endpoints on or beside
    /// a cross stay put, as does any endpoint whose new place would leave the
    /// grid's interior or touch a cross.
    ///
    /// Returns how many endpoints moved.
    pub fn nudge(&mut self, height: usize, width: usize, gap: f64) -> usize {
        let centers: Vec<Coord> = self.crosses().map(Cross::coord).collect();
        let open = |p: Point| {
            (1.0..=height as f64 - 2.0).contains(&p.x)
                && (1.0..=width as f64 - 2.0).contains(&p.y)
                && centers.iter().all(|c| c.chebyshev(p.coord()) > 1)
        };
        let n = self.items.len();
        let mut moved = 0;
        for i in 0..n {
            for j in 0..n {
                let (LineLike::Line(a), LineLike::Line(b)) = (self.items[i], self.items[j]) else {
                    continue;
                };
                if i == j || a.shares_endpoint(&b) || a.intersects(&b) {
                    continue;
                }
                for end in [a.p1, a.p2] {
                    let near = b.closest_point(end);
                    let distance = near.distance(end);
                    if distance >= gap || distance < EPSILON {
                        continue;
                    }
                    let scale = gap / distance;
                    let target = Point::new(
                        near.x + (end.x - near.x) * scale,
                        near.y + (end.y - near.y) * scale,
                    );
                    if open(end) && open(target) {
                        tracing::trace!("[sketch] nudged {end} to {target}, away from {b}");
                        self.move_endpoint(end, target);
                        moved += 1;
                    }
                }
            }
        }
        moved
    }

    fn move_endpoint(&mut self, from: Point, to: Point) {
        for item in &mut self.items {
            if let LineLike::Line(line) = item {
                for end in [&mut line.p1, &mut line.p2] {
                    if *end == from {
                        *end = to;
                    }
                }
            }
        }
    }

    fn next_resolvable(&self, height: usize, width: usize) -> Option<(usize, usize, Coord)> {
        let n = self.items.len();
        for i in 0..n {
            let LineLike::Line(a) = &self.items[i] else {
                continue;
            };
            for j in i + 1..n {
                let LineLike::Line(b) = &self.items[j] else {
                    continue;
                };
                if !a.crosses_properly(b) {
                    continue;
                }
                if let Some(point) = a.intersection_point(b)
                    && self.is_valid_site(point.coord(), height, width)
                {
                    return Some((i, j, point.coord()));
                }
            }
        }
        None
    }

    fn is_valid_site(&self, site: Coord, height: usize, width: usize) -> bool {
        let interior = site.x >= 1
            && site.y >= 1
            && (site.x as usize) + 2 <= height
            && (site.y as usize) + 2 <= width;
        interior
            && self.crosses().all(|c| c.coord().chebyshev(site) >= 3)
            && self
                .lines()
                .flat_map(|l| [l.p1, l.p2])
                .all(|p| p.coord().chebyshev(site) >= 2)
    }
}

fn dominant_axis(line: &Line) -> [Direction; 2] {
    let d = line.direction();
    if d.dx.abs() >= d.dy.abs() {
        [Direction::North, Direction::South]
    } else {
        [Direction::West, Direction::East]
    }
}

fn other_axis(axis: [Direction; 2]) -> [Direction; 2] {
    if axis[0].is_vertical() {
        [Direction::West, Direction::East]
    } else {
        [Direction::North, Direction::South]
    }
}

/// The arms of the cross at `site` on `axis`: the one facing `line.p1` first.
fn arms(site: Coord, line: &Line, axis: [Direction; 2]) -> (Coord, Coord) {
    let [low, high] = axis;
    let toward_low = if low.is_vertical() {
        line.p1.x <= line.p2.x
    } else {
        line.p1.y <= line.p2.y
    };
    if toward_low {
        (site.step(low), site.step(high))
    } else {
        (site.step(high), site.step(low))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_cross_lines() {
        let [east_west, north_south] = Cross::new(Coord::new(5, 5)).lines();
        assert_eq!(east_west, line(5.0, 4.0, 5.0, 6.0));
        assert_eq!(north_south, line(4.0, 5.0, 6.0, 5.0));
    }

    #[test]
    fn test_cross_intersections() {
        let cross = Cross::new(Coord::new(5, 5));
        let diagonal = LineLike::Line(line(1.0, 1.0, 9.0, 9.0));
        let edge = LineLike::Line(line(1.0, 1.0, 1.0, 9.0));
        let plus = LineLike::Cross(cross);
        assert!(plus.intersects(&diagonal));
        assert!(diagonal.intersects(&plus));
        assert!(!plus.intersects(&edge));
        assert!(!edge.intersects(&plus));
        assert!(cross.intersects_cross(&Cross::new(Coord::new(5, 6))));
        assert!(!cross.intersects_cross(&Cross::new(Coord::new(7, 7))));
    }

    #[test]
    fn test_crossing_found() {
        let l1 = line(1.0, 1.0, 1.0, 5.0);
        let l2 = line(2.0, 5.0, 9.0, 5.0);
        let l3 = line(2.0, 2.0, 8.0, 8.0);
        let mut collection = LineLikeCollection::from_lines([l1, l2, l3]);
        assert_eq!(collection.len(), 3);
        assert_eq!(
            collection.crossing(),
            Some((LineLike::Line(l2), LineLike::Line(l3)))
        );
        assert_eq!(collection.items(), &[LineLike::Line(l1)]);
    }

    #[test]
    fn test_crossing_absent() {
        let lines = [
            line(1.0, 1.0, 1.0, 5.0),
            line(2.0, 5.0, 9.0, 5.0),
            line(9.0, 4.0, 3.0, 1.0),
        ];
        let mut collection = LineLikeCollection::from_lines(lines);
        assert_eq!(collection.crossing(), None);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_uncross_resolves_an_x() {
        let mut collection = LineLikeCollection::from_lines([
            line(0.0, 0.0, 10.0, 10.0),
            line(0.0, 10.0, 10.0, 0.0),
        ]);
        assert_eq!(collection.uncross(11, 11, 64), 1);
        let crosses: Vec<&Cross> = collection.crosses().collect();
        assert_eq!(crosses, vec![&Cross::new(Coord::new(5, 5))]);
        let ends: Vec<(Coord, Coord)> = collection
            .lines()
            .map(|l| (l.p1.coord(), l.p2.coord()))
            .collect();
        assert_eq!(
            ends,
            vec![
                (Coord::new(0, 0), Coord::new(4, 5)),
                (Coord::new(6, 5), Coord::new(10, 10)),
                (Coord::new(0, 10), Coord::new(5, 6)),
                (Coord::new(5, 4), Coord::new(10, 0)),
            ]
        );
        assert!(!collection.lines().any(|a| {
            collection.lines().any(|b| a.crosses_properly(b))
        }));
    }

    #[test]
    fn test_uncross_rejects_crowded_sites() {
        // Crossing at (1,1) is too close to the endpoint (0,2)
        let mut collection = LineLikeCollection::from_lines([
            line(0.0, 0.0, 2.0, 2.0),
            line(0.0, 2.0, 2.0, 0.0),
        ]);
        assert_eq!(collection.uncross(10, 10, 64), 0);
        assert_eq!(collection.len(), 2);

        let mut collection = LineLikeCollection::from_lines([
            line(0.0, 0.0, 10.0, 10.0),
            line(0.0, 10.0, 10.0, 0.0),
        ]);
        assert_eq!(collection.uncross(11, 11, 0), 0);
    }

    #[test]
    fn test_nudge_pulls_near_endpoint_away() {
        let top = line(1.0, 1.0, 1.0, 9.0);
        let stem = line(8.0, 5.0, 2.0, 5.0);
        let next = line(2.0, 5.0, 6.0, 8.0);
        let mut collection = LineLikeCollection::from_lines([top, stem, next]);
        assert_eq!(collection.nudge(11, 11, 2.0), 1);
        assert_eq!(
            collection.items(),
            &[
                LineLike::Line(top),
                LineLike::Line(line(8.0, 5.0, 3.0, 5.0)),
                LineLike::Line(line(3.0, 5.0, 6.0, 8.0)),
            ]
        );
        assert_eq!(collection.nudge(11, 11, 2.0), 0);
    }

    #[test]
    fn test_nudge_leaves_cross_arms_and_border() {
        let arm = line(5.0, 6.0, 5.0, 9.0);
        let near = line(6.0, 7.0, 9.0, 7.0);
        let mut collection = LineLikeCollection::new(vec![
            LineLike::Cross(Cross::new(Coord::new(5, 5))),
            LineLike::Line(arm),
            LineLike::Line(near),
        ]);
        assert_eq!(collection.nudge(11, 11, 2.0), 1);
        let lines: Vec<&Line> = collection.lines().collect();
        assert_eq!(lines, vec![&arm, &line(7.0, 7.0, 9.0, 7.0)]);

        // Row 1 can only be pushed north, off the interior
        let mut collection =
            LineLikeCollection::from_lines([line(2.0, 1.0, 2.0, 9.0), line(1.0, 4.0, 1.0, 6.0)]);
        assert_eq!(collection.nudge(11, 11, 2.0), 0);
    }
}
