use crate::geometry::{Direction, Point, Rect};

/// Single-bend fallback: split along the dominant axis at its midpoint.
/// Always four points, some possibly coincident.
pub fn default_route(start: Point, end: Point) -> Vec<Point> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() > dy.abs() {
        let mid_x = (start.x + end.x) / 2.0;
        vec![start, Point::new(mid_x, start.y), Point::new(mid_x, end.y), end]
    } else {
        let mid_y = (start.y + end.y) / 2.0;
        vec![start, Point::new(start.x, mid_y), Point::new(end.x, mid_y), end]
    }
}

/// Drop repeated points and interior points whose incoming and outgoing
/// travel directions match. The first and last points always survive.
pub fn simplify(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let first = points[0];
    let last = points[points.len() - 1];

    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    distinct.push(first);
    for &point in &points[1..points.len() - 1] {
        if distinct.last() != Some(&point) {
            distinct.push(point);
        }
    }
    while distinct.len() > 1 && distinct.last() == Some(&last) {
        distinct.pop();
    }
    distinct.push(last);

    let mut out: Vec<Point> = Vec::with_capacity(distinct.len());
    out.push(first);
    for idx in 1..distinct.len() - 1 {
        let prev = out[out.len() - 1];
        let curr = distinct[idx];
        let next = distinct[idx + 1];
        if Direction::from_vector(curr - prev) == Direction::from_vector(next - curr) {
            continue;
        }
        out.push(curr);
    }
    out.push(last);
    out
}

/// Round every coordinate to a whole unit so strokes land on pixel boundaries.
pub fn pixel_align(points: &[Point]) -> Vec<Point> {
    points.iter().map(|p| p.round()).collect()
}

pub fn path_length(points: &[Point]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

pub fn bend_count(points: &[Point]) -> usize {
    points
        .windows(3)
        .filter(|w| {
            let a = Direction::from_vector(w[1] - w[0]);
            let b = Direction::from_vector(w[2] - w[1]);
            a != Direction::None && b != Direction::None && a != b
        })
        .count()
}

/// Number of (segment, obstacle) pairs where the segment passes through the
/// obstacle's interior.
pub fn obstacle_crossings(points: &[Point], obstacles: &[Rect]) -> usize {
    points
        .windows(2)
        .map(|w| {
            obstacles
                .iter()
                .filter(|rect| rect.segment_crosses_interior(w[0], w[1]))
                .count()
        })
        .sum()
}

pub fn is_orthogonal(points: &[Point]) -> bool {
    points.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn default_route_splits_wide_spans_horizontally() {
        let route = default_route(Point::new(0.0, 0.0), Point::new(100.0, 40.0));
        assert_eq!(route, pts(&[(0.0, 0.0), (50.0, 0.0), (50.0, 40.0), (100.0, 40.0)]));
    }

    #[test]
    fn default_route_splits_tall_spans_vertically() {
        let route = default_route(Point::new(0.0, 0.0), Point::new(30.0, 100.0));
        assert_eq!(route, pts(&[(0.0, 0.0), (0.0, 50.0), (30.0, 50.0), (30.0, 100.0)]));
        // Equal spans take the vertical branch.
        let route = default_route(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert_eq!(route[1], Point::new(0.0, 5.0));
    }

    #[test]
    fn simplify_collapses_straight_default_routes() {
        let route = default_route(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert_eq!(simplify(&route), pts(&[(0.0, 0.0), (100.0, 0.0)]));
        let route = default_route(Point::new(0.0, 0.0), Point::new(0.0, 100.0));
        assert_eq!(simplify(&route), pts(&[(0.0, 0.0), (0.0, 100.0)]));
    }

    #[test]
    fn simplify_keeps_bends() {
        let route = pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (20.0, 10.0), (20.0, 30.0), (40.0, 30.0)]);
        assert_eq!(simplify(&route), pts(&[(0.0, 0.0), (20.0, 0.0), (20.0, 30.0), (40.0, 30.0)]));
    }

    #[test]
    fn simplify_keeps_coincident_endpoints() {
        let p = Point::new(7.0, 7.0);
        assert_eq!(simplify(&[p, p, p, p]), vec![p, p]);
    }

    #[test]
    fn simplify_drops_repeats_next_to_the_end() {
        let route = pts(&[(0.0, 0.0), (0.0, 10.0), (5.0, 10.0), (5.0, 10.0)]);
        assert_eq!(simplify(&route), pts(&[(0.0, 0.0), (0.0, 10.0), (5.0, 10.0)]));
    }

    #[test]
    fn pixel_align_rounds_half_away_from_zero() {
        let aligned = pixel_align(&pts(&[(0.5, -0.4), (10.4, -3.6)]));
        assert_eq!(aligned, pts(&[(1.0, 0.0), (10.0, -4.0)]));
        assert!(aligned[0].y.is_sign_positive());
    }

    #[test]
    fn metrics() {
        let route = pts(&[(0.0, 0.0), (0.0, 10.0), (5.0, 10.0), (5.0, 0.0)]);
        assert_eq!(path_length(&route), 25.0);
        assert_eq!(bend_count(&route), 2);
        assert!(is_orthogonal(&route));
        let obstacles = [Rect::new(1.0, 1.0, 3.0, 3.0), Rect::new(-1.0, 2.0, 3.0, 3.0)];
        assert_eq!(obstacle_crossings(&route, &obstacles), 1);
    }
}
