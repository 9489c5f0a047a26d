use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};
use crate::geometry::{Direction, Point, Rect};

/// One end of a connector: where it attaches and which way it must leave.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Endpoint {
    pub point: Point,
    #[serde(default)]
    pub direction: Direction,
}

impl Endpoint {
    pub fn new(point: Point, direction: Direction) -> Self {
        Self { point, direction }
    }

    pub fn free(point: Point) -> Self {
        Self::new(point, Direction::None)
    }
}

/// Everything a single routing call needs. Built fresh per call; nothing is
/// read from ambient canvas state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Endpoint,
    pub end: Endpoint,
    #[serde(default)]
    pub obstacles: Vec<Rect>,
}

impl RouteRequest {
    pub fn new(start: Endpoint, end: Endpoint, obstacles: Vec<Rect>) -> Self {
        Self {
            start,
            end,
            obstacles,
        }
    }

    /// Build the request the way an editor does while dragging a handle: the
    /// shapes under each endpoint become the obstacles and decide the exit
    /// directions.
    pub fn from_lookup<L: ObstacleLookup + ?Sized>(start: Point, end: Point, lookup: &L) -> Self {
        let start_rect = lookup.obstacle_at(start);
        let end_rect = lookup.obstacle_at(end);
        let mut obstacles = Vec::with_capacity(2);
        for rect in [start_rect, end_rect] {
            if !rect.is_empty() && !obstacles.contains(&rect) {
                obstacles.push(rect);
            }
        }
        Self {
            start: Endpoint::new(start, exit_direction(start, &start_rect)),
            end: Endpoint::new(end, exit_direction(end, &end_rect)),
            obstacles,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.start.point.is_finite() {
            return Err(RouteError::InvalidRequest(
                "start point has non-finite coordinates".to_string(),
            ));
        }
        if !self.end.point.is_finite() {
            return Err(RouteError::InvalidRequest(
                "end point has non-finite coordinates".to_string(),
            ));
        }
        Ok(())
    }

    /// Obstacles that can actually block a route: non-empty, first occurrence
    /// of each rectangle, in request order.
    pub fn active_obstacles(&self) -> Vec<Rect> {
        let mut out: Vec<Rect> = Vec::with_capacity(self.obstacles.len());
        for rect in &self.obstacles {
            if rect.is_empty() || out.contains(rect) {
                continue;
            }
            out.push(*rect);
        }
        out
    }
}

/// Hit-testing seam: the bounding box of whatever occupies `point`, or an
/// empty rectangle when nothing does.
pub trait ObstacleLookup {
    fn obstacle_at(&self, point: Point) -> Rect;
}

impl ObstacleLookup for [Rect] {
    fn obstacle_at(&self, point: Point) -> Rect {
        self.iter()
            .copied()
            .find(|rect| !rect.is_empty() && rect.contains(point))
            .unwrap_or(Rect::EMPTY)
    }
}

impl ObstacleLookup for Vec<Rect> {
    fn obstacle_at(&self, point: Point) -> Rect {
        self.as_slice().obstacle_at(point)
    }
}

impl<F> ObstacleLookup for F
where
    F: Fn(Point) -> Rect,
{
    fn obstacle_at(&self, point: Point) -> Rect {
        self(point)
    }
}

/// Exit direction for a point attached to `rect`: the vector from the center
/// to the point, classified to the nearest cardinal direction.
pub fn exit_direction(point: Point, rect: &Rect) -> Direction {
    if rect.is_empty() {
        return Direction::None;
    }
    Direction::cardinal_from_vector(point - rect.center())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_direction_follows_the_offset_from_center() {
        let rect = Rect::new(0.0, 0.0, 200.0, 40.0);
        assert_eq!(exit_direction(Point::new(200.0, 20.0), &rect), Direction::East);
        assert_eq!(exit_direction(Point::new(0.0, 20.0), &rect), Direction::West);
        assert_eq!(exit_direction(Point::new(100.0, 0.0), &rect), Direction::North);
        // On the bottom edge of a wide box, but the offset (80, 20) is mostly horizontal.
        assert_eq!(exit_direction(Point::new(180.0, 40.0), &rect), Direction::East);
        assert_eq!(exit_direction(Point::new(110.0, 40.0), &rect), Direction::South);
    }

    #[test]
    fn exit_direction_is_none_without_a_shape() {
        assert_eq!(exit_direction(Point::new(5.0, 5.0), &Rect::EMPTY), Direction::None);
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(exit_direction(rect.center(), &rect), Direction::None);
        assert_eq!(exit_direction(Point::new(10.0, 10.0), &rect), Direction::None);
    }

    #[test]
    fn from_lookup_collects_distinct_shapes() {
        let shapes = vec![
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(300.0, 0.0, 100.0, 50.0),
        ];
        let request = RouteRequest::from_lookup(
            Point::new(100.0, 25.0),
            Point::new(300.0, 25.0),
            &shapes,
        );
        assert_eq!(request.obstacles, shapes);
        assert_eq!(request.start.direction, Direction::East);
        assert_eq!(request.end.direction, Direction::West);

        let same = RouteRequest::from_lookup(Point::new(100.0, 25.0), Point::new(0.0, 25.0), &shapes);
        assert_eq!(same.obstacles.len(), 1);
    }

    #[test]
    fn from_lookup_accepts_closures() {
        let lookup = |_: Point| Rect::EMPTY;
        let request = RouteRequest::from_lookup(Point::new(0.0, 0.0), Point::new(9.0, 9.0), &lookup);
        assert!(request.obstacles.is_empty());
        assert_eq!(request.start.direction, Direction::None);
    }

    #[test]
    fn active_obstacles_drop_empty_and_duplicates() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let request = RouteRequest::new(
            Endpoint::free(Point::new(0.0, 0.0)),
            Endpoint::free(Point::new(1.0, 1.0)),
            vec![rect, Rect::EMPTY, rect, Rect::new(5.0, 5.0, 0.0, 3.0)],
        );
        assert_eq!(request.active_obstacles(), vec![rect]);
    }

    #[test]
    fn validate_rejects_nan_endpoints() {
        let request = RouteRequest::new(
            Endpoint::free(Point::new(f32::NAN, 0.0)),
            Endpoint::free(Point::new(1.0, 1.0)),
            Vec::new(),
        );
        assert!(matches!(request.validate(), Err(RouteError::InvalidRequest(_))));
    }

    #[test]
    fn request_parses_from_json() {
        let json = r#"{
            "start": { "point": { "x": 0, "y": 0 }, "direction": "east" },
            "end": { "point": { "x": 100, "y": 0 } },
            "obstacles": [{ "x": 40, "y": -10, "width": 20, "height": 20 }]
        }"#;
        let request: RouteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.start.direction, Direction::East);
        assert_eq!(request.end.direction, Direction::None);
        assert_eq!(request.obstacles.len(), 1);
    }
}
