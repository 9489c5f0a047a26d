use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};
use crate::geometry::Point;
use crate::request::{ObstacleLookup, RouteRequest};
use crate::routing::{RouteOutcome, Router};

/// Handle index of a connector's start.
pub const START_HANDLE: usize = 0;
/// Handle index of a connector's end.
pub const END_HANDLE: usize = 1;
pub const HANDLE_COUNT: usize = 2;

/// An orthogonal connector: two draggable handles and the routed polyline
/// between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    start: Point,
    end: Point,
    points: Vec<Point>,
}

impl Connector {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            points: vec![start, end],
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Routed geometry from the last [`Connector::reroute`]; a straight
    /// two-point line before the first one.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn handle(&self, index: usize) -> Result<Point> {
        match index {
            START_HANDLE => Ok(self.start),
            END_HANDLE => Ok(self.end),
            _ => Err(RouteError::HandleOutOfRange {
                index,
                count: HANDLE_COUNT,
            }),
        }
    }

    /// Move one handle. The routed points are left alone until the next reroute.
    pub fn set_handle(&mut self, index: usize, point: Point) -> Result<()> {
        match index {
            START_HANDLE => self.start = point,
            END_HANDLE => self.end = point,
            _ => {
                return Err(RouteError::HandleOutOfRange {
                    index,
                    count: HANDLE_COUNT,
                });
            }
        }
        Ok(())
    }

    /// The request this connector would route with against `lookup`.
    pub fn request<L: ObstacleLookup + ?Sized>(&self, lookup: &L) -> RouteRequest {
        RouteRequest::from_lookup(self.start, self.end, lookup)
    }

    /// Recompute the geometry from scratch against the shapes under each handle.
    pub fn reroute<L: ObstacleLookup + ?Sized>(&mut self, lookup: &L, router: &Router) -> RouteOutcome {
        let outcome = router.route_detailed(&self.request(lookup));
        self.points = outcome.points.clone();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Direction, Rect};
    use crate::routing::RouteKind;

    #[test]
    fn handles_are_indexed_start_then_end() {
        let mut connector = Connector::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        assert_eq!(connector.handle(0), Ok(Point::new(1.0, 2.0)));
        assert_eq!(connector.handle(1), Ok(Point::new(3.0, 4.0)));
        connector.set_handle(1, Point::new(9.0, 9.0)).unwrap();
        assert_eq!(connector.end(), Point::new(9.0, 9.0));
    }

    #[test]
    fn out_of_range_handles_are_rejected() {
        let mut connector = Connector::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert_eq!(
            connector.handle(2),
            Err(RouteError::HandleOutOfRange { index: 2, count: 2 })
        );
        assert!(connector.set_handle(7, Point::new(5.0, 5.0)).is_err());
        assert_eq!(connector.start(), Point::new(0.0, 0.0));
    }

    #[test]
    fn reroute_uses_shapes_under_the_handles() {
        let shapes = vec![Rect::new(0.0, 0.0, 100.0, 50.0), Rect::new(300.0, 100.0, 100.0, 50.0)];
        let mut connector = Connector::new(Point::new(100.0, 25.0), Point::new(300.0, 125.0));
        let request = connector.request(&shapes);
        assert_eq!(request.start.direction, Direction::East);
        assert_eq!(request.obstacles.len(), 2);

        let outcome = connector.reroute(&shapes, &Router::default());
        assert_eq!(outcome.kind, RouteKind::Searched);
        assert_eq!(connector.points(), outcome.points.as_slice());
        assert_eq!(connector.points().first(), Some(&Point::new(100.0, 25.0)));
        assert_eq!(connector.points().last(), Some(&Point::new(300.0, 125.0)));
    }

    #[test]
    fn reroute_in_empty_space_takes_the_default_route() {
        let mut connector = Connector::new(Point::new(0.0, 0.0), Point::new(80.0, 20.0));
        let nothing = |_: Point| Rect::EMPTY;
        let outcome = connector.reroute(&nothing, &Router::default());
        assert!(outcome.is_fallback());
        assert_eq!(connector.points().len(), 4);
    }
}
