use log::trace;

use crate::geometry::{Direction, Point, Rect, find_obstacle_exit, normalize_zero};
use crate::request::Endpoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEdge {
    pub from: Point,
    pub to: Point,
}

impl GridEdge {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }
}

/// Compressed routing grid for one request.
///
/// `xs`/`ys` are strictly increasing. `edges` join adjacent coordinates and
/// never cross an obstacle interior; `stubs` are the direct endpoint-to-exit
/// edges that let an endpoint leave the obstacle it sits in.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
    pub edges: Vec<GridEdge>,
    pub stubs: Vec<GridEdge>,
}

impl Grid {
    pub fn x_index(&self, x: f32) -> Option<usize> {
        self.xs.binary_search_by(|probe| probe.total_cmp(&x)).ok()
    }

    pub fn y_index(&self, y: f32) -> Option<usize> {
        self.ys.binary_search_by(|probe| probe.total_cmp(&y)).ok()
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.x_index(normalize_zero(point.x)).is_some() && self.y_index(normalize_zero(point.y)).is_some()
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &GridEdge> {
        self.stubs.iter().chain(self.edges.iter())
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Extent of the candidate coordinates before any endpoint is extended.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl Bounds {
    fn of(xs: &[f32], ys: &[f32]) -> Self {
        let fold = |values: &[f32]| {
            values
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
        };
        let (min_x, max_x) = fold(xs);
        let (min_y, max_y) = fold(ys);
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    fn is_extreme(&self, point: Point, direction: Direction) -> bool {
        match direction {
            Direction::North => point.y <= self.min_y,
            Direction::South => point.y >= self.max_y,
            Direction::West => point.x <= self.min_x,
            Direction::East => point.x >= self.max_x,
            Direction::None => false,
        }
    }
}

pub fn build_grid(obstacles: &[Rect], start: Endpoint, end: Endpoint, clearance: f32) -> Grid {
    let mut xs = Vec::with_capacity(obstacles.len() * 4 + 4);
    let mut ys = Vec::with_capacity(obstacles.len() * 4 + 4);

    for rect in obstacles {
        xs.extend([rect.left(), rect.right()]);
        ys.extend([rect.top(), rect.bottom()]);
    }
    push_lane_coordinates(obstacles, Axis::X, &mut xs);
    push_lane_coordinates(obstacles, Axis::Y, &mut ys);
    for point in [start.point, end.point] {
        xs.push(point.x);
        ys.push(point.y);
    }

    let bounds = Bounds::of(&xs, &ys);
    let mut stubs = Vec::new();
    for endpoint in [start, end] {
        if let Some(exit) = extension_point(obstacles, endpoint, &bounds, clearance) {
            xs.push(exit.x);
            ys.push(exit.y);
            stubs.push(GridEdge::new(endpoint.point, exit));
        }
    }

    compress(&mut xs);
    compress(&mut ys);

    let mut edges = Vec::new();
    for &x in &xs {
        for pair in ys.windows(2) {
            push_unblocked(&mut edges, obstacles, Point::new(x, pair[0]), Point::new(x, pair[1]));
        }
    }
    for &y in &ys {
        for pair in xs.windows(2) {
            push_unblocked(&mut edges, obstacles, Point::new(pair[0], y), Point::new(pair[1], y));
        }
    }

    trace!(
        "routing grid: {} x {} coordinates, {} edges, {} stubs",
        xs.len(),
        ys.len(),
        edges.len(),
        stubs.len()
    );

    Grid {
        xs,
        ys,
        edges,
        stubs,
    }
}

/// Free lanes between neighbouring obstacles along one axis: the midpoint of a
/// gap, or both facing edges when the pair overlaps on that axis.
fn push_lane_coordinates(obstacles: &[Rect], axis: Axis, out: &mut Vec<f32>) {
    let (near, far): (fn(&Rect) -> f32, fn(&Rect) -> f32) = match axis {
        Axis::X => (Rect::left, Rect::right),
        Axis::Y => (Rect::top, Rect::bottom),
    };
    let mut sorted: Vec<&Rect> = obstacles.iter().collect();
    sorted.sort_by(|a, b| near(a).total_cmp(&near(b)));
    for pair in sorted.windows(2) {
        let leading = far(pair[0]);
        let trailing = near(pair[1]);
        if leading < trailing {
            out.push((leading + trailing) / 2.0);
        } else {
            out.push(leading);
            out.push(trailing);
        }
    }
}

/// Where the stub from a directed endpoint ends: the far boundary of the
/// obstacles holding the endpoint, pushed out by `clearance` when that boundary is the
/// outermost coordinate in the exit direction.
fn extension_point(
    obstacles: &[Rect],
    endpoint: Endpoint,
    bounds: &Bounds,
    clearance: f32,
) -> Option<Point> {
    if endpoint.direction == Direction::None {
        return None;
    }
    let exit = find_obstacle_exit(obstacles, endpoint.point, endpoint.direction)
        .ok()?
        .unwrap_or(endpoint.point);
    let exit = if bounds.is_extreme(exit, endpoint.direction) {
        exit.step(endpoint.direction, clearance)
    } else {
        exit
    };
    (exit != endpoint.point && exit.is_finite()).then_some(exit)
}

fn compress(values: &mut Vec<f32>) {
    values.retain(|v| v.is_finite());
    for v in values.iter_mut() {
        *v = normalize_zero(*v);
    }
    values.sort_by(f32::total_cmp);
    values.dedup();
}

fn push_unblocked(edges: &mut Vec<GridEdge>, obstacles: &[Rect], a: Point, b: Point) {
    if obstacles.iter().any(|rect| rect.segment_crosses_interior(a, b)) {
        return;
    }
    edges.push(GridEdge::new(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free(x: f32, y: f32) -> Endpoint {
        Endpoint::free(Point::new(x, y))
    }

    fn has_edge(grid: &Grid, a: Point, b: Point) -> bool {
        grid.all_edges()
            .any(|e| (e.from == a && e.to == b) || (e.from == b && e.to == a))
    }

    #[test]
    fn coordinates_are_sorted_and_unique() {
        let obstacles = [
            Rect::new(50.0, 50.0, 50.0, 50.0),
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Rect::new(200.0, 10.0, 20.0, 20.0),
        ];
        let grid = build_grid(&obstacles, free(0.0, 0.0), free(300.0, 300.0), 20.0);
        for list in [&grid.xs, &grid.ys] {
            assert!(list.windows(2).all(|w| w[0] < w[1]), "{list:?}");
        }
    }

    #[test]
    fn gap_between_obstacles_gets_a_midpoint_lane() {
        let obstacles = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(30.0, 0.0, 10.0, 10.0)];
        let grid = build_grid(&obstacles, free(-10.0, 5.0), free(50.0, 5.0), 20.0);
        assert!(grid.xs.contains(&20.0));
        assert_eq!(grid.xs, vec![-10.0, 0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn overlapping_obstacles_keep_both_facing_edges() {
        let obstacles = [Rect::new(0.0, 0.0, 30.0, 10.0), Rect::new(20.0, 40.0, 30.0, 10.0)];
        let mut xs = Vec::new();
        push_lane_coordinates(&obstacles, Axis::X, &mut xs);
        assert_eq!(xs, vec![30.0, 20.0]);
        let mut ys = Vec::new();
        push_lane_coordinates(&obstacles, Axis::Y, &mut ys);
        assert_eq!(ys, vec![25.0]);
    }

    #[test]
    fn edges_never_cross_obstacle_interiors() {
        let obstacles = [Rect::new(10.0, 10.0, 30.0, 30.0), Rect::new(60.0, 0.0, 10.0, 80.0)];
        let grid = build_grid(&obstacles, free(0.0, 25.0), free(100.0, 25.0), 20.0);
        assert!(!grid.edges.is_empty());
        for edge in &grid.edges {
            for rect in &obstacles {
                assert!(!rect.segment_crosses_interior(edge.from, edge.to), "{edge:?} crosses {rect:?}");
            }
        }
        // The boundary of an obstacle stays routable.
        assert!(has_edge(&grid, Point::new(10.0, 10.0), Point::new(40.0, 10.0)));
        assert!(!has_edge(&grid, Point::new(10.0, 25.0), Point::new(40.0, 25.0)));
    }

    #[test]
    fn endpoint_inside_obstacle_gets_a_stub_to_its_boundary() {
        let obstacles = [Rect::new(0.0, 0.0, 100.0, 50.0), Rect::new(300.0, 0.0, 100.0, 50.0)];
        let start = Endpoint::new(Point::new(50.0, 25.0), Direction::East);
        let grid = build_grid(&obstacles, start, free(350.0, 80.0), 20.0);
        assert_eq!(grid.stubs, vec![GridEdge::new(start.point, Point::new(100.0, 25.0))]);
    }

    #[test]
    fn stub_leaves_every_overlapping_obstacle() {
        let obstacles = [Rect::new(0.0, 0.0, 100.0, 50.0), Rect::new(80.0, 10.0, 60.0, 30.0)];
        let start = Endpoint::new(Point::new(50.0, 25.0), Direction::East);
        let grid = build_grid(&obstacles, start, free(300.0, 25.0), 20.0);
        assert_eq!(grid.stubs, vec![GridEdge::new(start.point, Point::new(140.0, 25.0))]);
        assert!(grid.contains_point(Point::new(140.0, 25.0)));
    }

    #[test]
    fn extreme_exit_is_pushed_out_by_clearance() {
        let obstacles = [Rect::new(0.0, 0.0, 100.0, 50.0)];
        let start = Endpoint::new(Point::new(50.0, 50.0), Direction::South);
        let grid = build_grid(&obstacles, start, free(-40.0, 10.0), 20.0);
        assert_eq!(grid.stubs, vec![GridEdge::new(start.point, Point::new(50.0, 70.0))]);
        assert!(grid.ys.contains(&70.0));
        assert!(grid.contains_point(Point::new(50.0, 70.0)));
    }

    #[test]
    fn undirected_endpoints_get_no_stub() {
        let obstacles = [Rect::new(0.0, 0.0, 100.0, 50.0)];
        let grid = build_grid(&obstacles, free(50.0, 25.0), free(200.0, 25.0), 20.0);
        assert!(grid.stubs.is_empty());
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        let grid = build_grid(&[], free(0.0, 0.0), free(0.0, 0.0), 20.0);
        assert_eq!(grid.xs, vec![0.0]);
        assert!(grid.edges.is_empty());

        let grid = build_grid(
            &[Rect::new(5.0, 5.0, 0.0, 0.0)],
            free(f32::NAN, 0.0),
            free(10.0, 10.0),
            20.0,
        );
        assert!(grid.xs.iter().all(|x| x.is_finite()));
    }
}
