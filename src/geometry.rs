use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn manhattan(self, other: Point) -> f32 {
        (other.x - self.x).abs() + (other.y - self.y).abs()
    }

    pub fn round(self) -> Self {
        Self::new(normalize_zero(self.x.round()), normalize_zero(self.y.round()))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Offset `distance` units along `direction`; `None` leaves the point unchanged.
    pub fn step(self, direction: Direction, distance: f32) -> Self {
        self + direction.unit() * distance
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// `-0.0 == 0.0` but their bit patterns differ; keys and rounded output use `+0.0`.
pub(crate) fn normalize_zero(value: f32) -> f32 {
    if value == 0.0 { 0.0 } else { value }
}

/// Axis-aligned rectangle in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// A rectangle without area (or with non-finite geometry) never obstructs anything.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    /// Closed containment: points on the boundary are inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Open containment: boundary points are outside.
    pub fn contains_strictly(&self, point: Point) -> bool {
        point.x > self.left() && point.x < self.right() && point.y > self.top() && point.y < self.bottom()
    }

    /// True when the open interior of the rectangle overlaps the interior of the
    /// axis-aligned segment `a`-`b`. Segments running along an edge do not count.
    pub fn segment_crosses_interior(&self, a: Point, b: Point) -> bool {
        if a.x == b.x {
            let (y1, y2) = ordered(a.y, b.y);
            a.x > self.left() && a.x < self.right() && y1 < self.bottom() && y2 > self.top()
        } else if a.y == b.y {
            let (x1, x2) = ordered(a.x, b.x);
            a.y > self.top() && a.y < self.bottom() && x1 < self.right() && x2 > self.left()
        } else {
            let (x1, x2) = ordered(a.x, b.x);
            let (y1, y2) = ordered(a.y, b.y);
            x1 < self.right() && x2 > self.left() && y1 < self.bottom() && y2 > self.top()
        }
    }

    /// Point where a ray cast from `origin` along `direction` leaves the rectangle.
    ///
    /// Only the coordinate on the travel axis changes; an origin already past the
    /// far edge is returned unchanged.
    pub fn ray_exit(&self, origin: Point, direction: Direction) -> Result<Point> {
        let exit = match direction {
            Direction::North => Point::new(origin.x, origin.y.min(self.top())),
            Direction::South => Point::new(origin.x, origin.y.max(self.bottom())),
            Direction::West => Point::new(origin.x.min(self.left()), origin.y),
            Direction::East => Point::new(origin.x.max(self.right()), origin.y),
            Direction::None => return Err(RouteError::InvalidDirection),
        };
        Ok(exit)
    }

    /// Smallest rectangle with whole-unit edges that covers this one.
    pub fn snapped_outward(&self) -> Rect {
        Rect::from_edges(
            self.left().floor(),
            self.top().floor(),
            self.right().ceil(),
            self.bottom().ceil(),
        )
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Find the obstacle containing `point` and return where leaving it along
/// `direction` lands. `Ok(None)` when no obstacle contains the point.
///
/// Overlapping obstacles are left as one: when the exit lands on an edge
/// that leads straight into another obstacle, the ray carries on through it.
pub fn find_obstacle_exit(
    obstacles: &[Rect],
    point: Point,
    direction: Direction,
) -> Result<Option<Point>> {
    if direction == Direction::None {
        return Err(RouteError::InvalidDirection);
    }
    let Some(first) = obstacles.iter().find(|rect| rect.contains(point)) else {
        return Ok(None);
    };
    let mut exit = first.ray_exit(point, direction)?;
    // Every pass moves strictly further, so one per obstacle is enough.
    for _ in 0..obstacles.len() {
        let mut advanced = false;
        for rect in obstacles {
            if !rect.contains(exit) {
                continue;
            }
            let next = rect.ray_exit(exit, direction)?;
            if next != exit && rect.segment_crosses_interior(exit, next) {
                exit = next;
                advanced = true;
            }
        }
        if !advanced {
            break;
        }
    }
    Ok(Some(exit))
}

/// Cardinal travel direction. North points toward negative y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Nearest cardinal direction; the horizontal axis wins ties.
    pub fn from_vector(v: Point) -> Direction {
        if v.x == 0.0 && v.y == 0.0 {
            return Direction::None;
        }
        if v.x.abs() >= v.y.abs() {
            if v.x > 0.0 { Direction::East } else { Direction::West }
        } else if v.y > 0.0 {
            Direction::South
        } else {
            Direction::North
        }
    }

    /// Like [`Direction::from_vector`] but refuses to guess: exact diagonals and
    /// non-finite vectors classify as `None`.
    pub fn cardinal_from_vector(v: Point) -> Direction {
        if !v.is_finite() || v.x.abs() == v.y.abs() {
            return Direction::None;
        }
        Direction::from_vector(v)
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::None => Direction::None,
        }
    }

    /// Rotate 90° counterclockwise as seen on screen.
    pub fn left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
            Direction::None => Direction::None,
        }
    }

    /// Rotate 90° clockwise as seen on screen.
    pub fn right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::None => Direction::None,
        }
    }

    pub fn unit(self) -> Point {
        match self {
            Direction::North => Point::new(0.0, -1.0),
            Direction::East => Point::new(1.0, 0.0),
            Direction::South => Point::new(0.0, 1.0),
            Direction::West => Point::new(-1.0, 0.0),
            Direction::None => Point::new(0.0, 0.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}
