//! Floating-point plane geometry for sketching corridors before they are carved.
//!
//! Points use the grid's axes: `x` is the row and `y` the column.

mod cross;
mod sketch;

pub use cross::{Cross, LineLike, LineLikeCollection};
pub use sketch::PointSketch;

use std::fmt;

use crate::maze::Coord;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// The grid coordinate nearest to this point.
    pub fn coord(self) -> Coord {
        Coord::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<Coord> for Point {
    fn from(coord: Coord) -> Self {
        Point::new(coord.x.into(), coord.y.into())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2},{:.2})", self.x, self.y)
    }
}

/// The displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionVector {
    pub dx: f64,
    pub dy: f64,
}

impl DirectionVector {
    pub fn between(from: Point, to: Point) -> Self {
        DirectionVector {
            dx: to.x - from.x,
            dy: to.y - from.y,
        }
    }

    /// This vector turned a quarter turn.
    pub fn perpendicular(self) -> Self {
        DirectionVector {
            dx: -self.dy,
            dy: self.dx,
        }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy
    }

    /// The z component of the cross product; zero for parallel vectors.
    pub fn perp_dot(self, other: Self) -> f64 {
        self.dx * other.dy - self.dy * other.dx
    }

    pub fn is_parallel(self, other: Self) -> bool {
        other.dot(self.perpendicular()).abs() < EPSILON
    }
}

/// A segment from `p1` to `p2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    pub fn new(p1: Point, p2: Point) -> Self {
        Line { p1, p2 }
    }

    pub fn direction(&self) -> DirectionVector {
        DirectionVector::between(self.p1, self.p2)
    }

    pub fn is_parallel(&self, other: &Line) -> bool {
        self.direction().is_parallel(other.direction())
    }

    /// Whether `other` lies on the same infinite line. Only meaningful for parallel lines.
    pub fn coincides(&self, other: &Line) -> bool {
        self.direction()
            .is_parallel(DirectionVector::between(self.p1, other.p1))
    }

    pub fn shares_endpoint(&self, other: &Line) -> bool {
        [self.p1, self.p2]
            .iter()
            .any(|p| *p == other.p1 || *p == other.p2)
    }

    /// Segment parameters `(s, t)` of the crossing point along `self` and `other`,
    /// or `None` for parallel lines.
    fn parameters(&self, other: &Line) -> Option<(f64, f64)> {
        let u = self.direction();
        let v = other.direction();
        let denominator = u.perp_dot(v);
        if denominator.abs() < EPSILON {
            return None;
        }
        let w = DirectionVector::between(other.p1, self.p1);
        Some((v.perp_dot(w) / denominator, u.perp_dot(w) / denominator))
    }

    /// Whether the segments touch or overlap.
    ///
    /// Collinear segments intersect only when they overlap by more than a point,
    /// measured along whichever axis they run farther on.
    pub fn intersects(&self, other: &Line) -> bool {
        if self.is_parallel(other) {
            return self.coincides(other) && self.overlaps(other);
        }
        let Some((s, t)) = self.parameters(other) else {
            return false;
        };
        let inside = |k: f64| (-EPSILON..=1.0 + EPSILON).contains(&k);
        inside(s) && inside(t)
    }

    /// Whether the segments cross at a point interior to both.
    pub fn crosses_properly(&self, other: &Line) -> bool {
        if self.shares_endpoint(other) {
            return false;
        }
        match self.parameters(other) {
            Some((s, t)) => {
                let inside = |k: f64| k > EPSILON && k < 1.0 - EPSILON;
                inside(s) && inside(t)
            }
            None => false,
        }
    }

    fn overlaps(&self, other: &Line) -> bool {
        let d = self.direction();
        let project = |p: Point| if d.dx.abs() >= d.dy.abs() { p.x } else { p.y };
        let range = |l: &Line| {
            let (a, b) = (project(l.p1), project(l.p2));
            (a.min(b), a.max(b))
        };
        let (a_lo, a_hi) = range(self);
        let (b_lo, b_hi) = range(other);
        a_lo.max(b_lo) < a_hi.min(b_hi)
    }

    /// The point of the segment nearest to `point`.
    pub fn closest_point(&self, point: Point) -> Point {
        let u = self.direction();
        let length = u.dot(u);
        if length < EPSILON {
            return self.p1;
        }
        let t = (u.dot(DirectionVector::between(self.p1, point)) / length).clamp(0.0, 1.0);
        Point::new(self.p1.x + t * u.dx, self.p1.y + t * u.dy)
    }

    /// Where the infinite lines through both segments meet, or `None` for parallel lines.
    pub fn intersection_point(&self, other: &Line) -> Option<Point> {
        let (s, _) = self.parameters(other)?;
        let u = self.direction();
        Some(Point::new(self.p1.x + s * u.dx, self.p1.y + s * u.dy))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line{{{}->{}}}", self.p1, self.p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_point_coord_rounds() {
        assert_eq!(Point::new(3.001, 4.001).coord(), Coord::new(3, 4));
        assert_eq!(Point::new(2.6, -0.4).coord(), Coord::new(3, 0));
    }

    #[test]
    fn test_direction_vector() {
        let v = DirectionVector::between(Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert_eq!(v.perpendicular(), DirectionVector { dx: -1.0, dy: 1.0 });
        let parallel = DirectionVector::between(Point::new(1.0, 3.0), Point::new(2.0, 4.0));
        let skew = DirectionVector::between(Point::new(1.0, 3.0), Point::new(2.0, 5.0));
        assert!(v.is_parallel(parallel));
        assert!(!v.is_parallel(skew));
    }

    #[test]
    fn test_parallel_and_coincident() {
        let l1 = line(0.0, 0.0, 4.0, 2.0);
        let l2 = line(0.0, 1.0, 4.0, 3.0);
        let l3 = line(8.0, 4.0, 12.0, 6.0);
        assert!(l1.is_parallel(&l2));
        assert!(!l1.coincides(&l2));
        assert!(l1.is_parallel(&l3));
        assert!(l1.coincides(&l3));
        assert!(!l1.intersects(&l3));
    }

    #[test]
    fn test_intersects() {
        let cases = [
            (line(0.0, 0.0, 4.0, 2.0), line(1.0, 2.0, 3.0, 1.0), true),
            (line(0.0, 0.0, 4.0, 4.0), line(3.0, 3.0, 5.0, 5.0), true),
            (line(0.0, 0.0, 2.0, 2.0), line(3.0, 3.0, 5.0, 5.0), false),
            (line(0.0, 0.0, 2.0, 2.0), line(0.0, 9.0, 9.0, 0.0), false),
            (line(1.0, 1.0, 9.0, 9.0), line(1.0, 9.0, 9.0, 1.0), true),
            (line(5.0, 4.0, 5.0, 6.0), line(5.0, 5.0, 5.0, 7.0), true),
            (line(5.0, 4.0, 5.0, 6.0), line(5.0, 6.0, 5.0, 8.0), false),
        ];
        for (a, b, expected) in cases {
            assert_eq!(a.intersects(&b), expected, "{a} vs {b}");
            assert_eq!(b.intersects(&a), expected, "{b} vs {a}");
        }
    }

    #[test]
    fn test_crosses_properly() {
        let a = line(0.0, 0.0, 4.0, 4.0);
        assert!(a.crosses_properly(&line(0.0, 4.0, 4.0, 0.0)));
        assert!(!a.crosses_properly(&line(4.0, 4.0, 0.0, 8.0)));
        assert!(!a.crosses_properly(&line(2.0, 2.0, 0.0, 6.0)));
        assert!(!a.crosses_properly(&line(1.0, 1.0, 3.0, 3.0)));
    }

    #[test]
    fn test_intersection_point() {
        let l1 = line(0.0, 0.0, 2.0, 2.0);
        let l2 = line(0.0, 8.0, 8.0, 0.0);
        for p in [l1.intersection_point(&l2), l2.intersection_point(&l1)] {
            let p = p.unwrap();
            assert!((p.x - 4.0).abs() < 1e-9 && (p.y - 4.0).abs() < 1e-9);
        }
        assert_eq!(l1.intersection_point(&line(1.0, 0.0, 3.0, 2.0)), None);
    }

    #[test]
    fn test_closest_point() {
        let l = line(0.0, 0.0, 0.0, 4.0);
        assert_eq!(l.closest_point(Point::new(2.0, 2.0)), Point::new(0.0, 2.0));
        assert_eq!(l.closest_point(Point::new(1.0, -3.0)), Point::new(0.0, 0.0));
        assert_eq!(l.closest_point(Point::new(-1.0, 6.0)), Point::new(0.0, 4.0));
        assert_eq!(Point::new(2.0, 2.0).distance(Point::new(0.0, 2.0)), 2.0);
    }
}
