//! Direction- and bend-aware cost model for connector search.
//!
//! A route's cost is its accumulated length multiplied by `1 + bends`, so
//! each turn scales the whole path rather than adding a constant. The first
//! hop must leave the start in its exit direction and the last hop must
//! arrive travelling against the end's exit direction.

use petgraph::graph::NodeIndex;

use crate::geometry::{Direction, Point};
use crate::request::Endpoint;

use super::graph::RoutingGraph;
use super::search::SearchSpace;

/// Search state carried by a node: how it was entered and what it took to get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLabel {
    pub direction: Direction,
    pub length: f32,
    pub bends: u32,
}

impl RouteLabel {
    pub fn origin(direction: Direction) -> Self {
        Self {
            direction,
            length: 0.0,
            bends: 0,
        }
    }

    pub fn cost(&self) -> f32 {
        self.length * (1.0 + self.bends as f32)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    start: Point,
    start_exit: Direction,
    end: Point,
    /// Travel direction required on the final hop (reverse of the end's exit).
    end_arrival: Direction,
}

impl CostModel {
    pub fn new(start: Endpoint, end: Endpoint) -> Self {
        Self {
            start: start.point,
            start_exit: start.direction,
            end: end.point,
            end_arrival: end.direction.reverse(),
        }
    }

    pub fn start_label(&self) -> RouteLabel {
        RouteLabel::origin(self.start_exit)
    }

    pub fn end_arrival(&self) -> Direction {
        self.end_arrival
    }

    /// Label for `to` when entered from `from` (carrying `label`), or `None`
    /// when the hop violates an endpoint direction.
    pub fn step(&self, from: Point, label: &RouteLabel, to: Point) -> Option<RouteLabel> {
        let length = from.distance(to);
        let direction = Direction::from_vector(to - from);
        // Judged from the incoming label alone; the target's own state never waives a bend.
        let bends = if label.direction == Direction::None || label.direction == direction {
            0
        } else {
            1
        };
        if to == self.end && self.end_arrival != Direction::None && direction != self.end_arrival {
            return None;
        }
        if from == self.start && bends > 0 {
            return None;
        }
        Some(RouteLabel {
            direction,
            length: label.length + length,
            bends: label.bends + bends,
        })
    }

    /// Cost of entering `to` from `from`; infinite when the hop is forbidden.
    pub fn cost_from(&self, from: Point, label: &RouteLabel, to: Point) -> f32 {
        self.step(from, label, to)
            .map_or(f32::INFINITY, |next| next.cost())
    }

    /// Manhattan distance to the end scaled by the turns the final approach
    /// still needs. Deliberately pessimistic for approaches from behind.
    pub fn heuristic_cost_to(&self, point: Point) -> f32 {
        let distance = point.manhattan(self.end);
        distance * (1.0 + self.estimated_bends(point) as f32)
    }

    fn estimated_bends(&self, point: Point) -> u32 {
        let required = self.end_arrival;
        if required == Direction::None {
            return 0;
        }
        let toward = Direction::from_vector(self.end - point);
        if toward == required {
            0
        } else if toward == required.left() || toward == required.right() {
            1
        } else if toward == required.reverse() {
            2
        } else {
            4
        }
    }
}

/// [`SearchSpace`] over a routing graph priced by a [`CostModel`].
pub struct RouteSearch<'a> {
    graph: &'a RoutingGraph,
    model: &'a CostModel,
}

impl<'a> RouteSearch<'a> {
    pub fn new(graph: &'a RoutingGraph, model: &'a CostModel) -> Self {
        Self { graph, model }
    }
}

impl SearchSpace for RouteSearch<'_> {
    type Node = NodeIndex;
    type Label = RouteLabel;

    fn neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors(node).collect()
    }

    fn extend(&self, from: NodeIndex, label: &RouteLabel, to: NodeIndex) -> Option<RouteLabel> {
        self.model
            .step(self.graph.point(from), label, self.graph.point(to))
    }

    fn cost(&self, label: &RouteLabel) -> f32 {
        label.cost()
    }

    fn heuristic(&self, node: NodeIndex) -> f32 {
        self.model.heuristic_cost_to(self.graph.point(node))
    }
}
