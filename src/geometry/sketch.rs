use rand::{Rng, seq::SliceRandom};

use crate::geometry::{Line, Point};

/// A polyline from the top-left to the bottom-right corner of a grid through
/// distinct random interior points.
#[derive(Debug, Clone)]
pub struct PointSketch {
    points: Vec<Point>,
}

impl PointSketch {
    /// Picks up to `inner_count` interior points of a `span_x`x`span_y` grid.
    /// Small grids yield fewer points.
    pub fn random(span_x: usize, span_y: usize, inner_count: usize, rng: &mut impl Rng) -> Self {
        let mut eligible = all_inner_points(span_x, span_y);
        eligible.shuffle(rng);
        eligible.truncate(inner_count);

        let mut points = Vec::with_capacity(eligible.len() + 2);
        points.push(Point::new(0.0, 0.0));
        points.extend(eligible);
        points.push(Point::new(
            span_x.saturating_sub(1) as f64,
            span_y.saturating_sub(1) as f64,
        ));
        PointSketch { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consecutive points joined into segments.
    pub fn lines(&self) -> Vec<Line> {
        self.points
            .windows(2)
            .map(|pair| Line::new(pair[0], pair[1]))
            .collect()
    }
}

/// Every point off the grid's border, in row-major order.
pub fn all_inner_points(span_x: usize, span_y: usize) -> Vec<Point> {
    let inner = |span: usize| 1..span.saturating_sub(1);
    inner(span_x)
        .flat_map(|x| inner(span_y).map(move |y| Point::new(x as f64, y as f64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn points(list: &[(f64, f64)]) -> Vec<Point> {
        list.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_all_inner_points() {
        assert_eq!(all_inner_points(3, 3), points(&[(1.0, 1.0)]));
        assert_eq!(all_inner_points(3, 4), points(&[(1.0, 1.0), (1.0, 2.0)]));
        assert_eq!(all_inner_points(4, 3), points(&[(1.0, 1.0), (2.0, 1.0)]));
        assert_eq!(
            all_inner_points(4, 4),
            points(&[(1.0, 1.0), (1.0, 2.0), (2.0, 1.0), (2.0, 2.0)])
        );
        assert!(all_inner_points(2, 9).is_empty());
    }

    #[test]
    fn test_random_sketch() {
        let mut rng = StdRng::seed_from_u64(4);
        let sketch = PointSketch::random(10, 20, 4, &mut rng);
        assert_eq!(sketch.points().len(), 6);
        assert_eq!(sketch.points()[0], Point::new(0.0, 0.0));
        assert_eq!(sketch.points()[5], Point::new(9.0, 19.0));
        let lines = sketch.lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1].p1, lines[0].p2);
    }

    #[test]
    fn test_sketch_runs_out_of_points() {
        let mut rng = StdRng::seed_from_u64(4);
        let sketch = PointSketch::random(3, 3, 8, &mut rng);
        assert_eq!(sketch.points(), points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]));
    }
}
