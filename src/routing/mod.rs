//! Orthogonal connector routing.
//!
//! [`Router::route`] turns a [`RouteRequest`] into a polyline of horizontal and
//! vertical segments: build a compressed grid around the obstacles, search it
//! with the bend-aware cost model, and fall back to a single-bend default
//! route when there is nothing to avoid or nothing to find. The result is
//! always simplified and, by default, snapped to whole units.

pub mod cost;
pub mod graph;
pub mod grid;
pub mod path;
pub mod search;

use log::debug;
use serde::Serialize;

use crate::config::RouterConfig;
use crate::geometry::{Point, Rect};
use crate::request::RouteRequest;

use self::cost::{CostModel, RouteSearch};
use self::graph::RoutingGraph;
use self::grid::{Grid, build_grid};
use self::search::{SearchOutcome, astar};

pub use self::path::{bend_count, default_route, is_orthogonal, obstacle_crossings, path_length, simplify};

/// Why the default route was used instead of a searched one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackReason {
    /// No non-empty obstacle applied to the request.
    NoObstacles,
    /// The grid has no connection between the endpoints.
    NoPath,
    /// The search hit `max_steps` before reaching the end.
    BudgetExhausted,
    /// Coincident or non-finite endpoints.
    Degenerate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "reason")]
pub enum RouteKind {
    Searched,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOutcome {
    pub points: Vec<Point>,
    pub kind: RouteKind,
    /// Nodes expanded by the search; zero when no search ran.
    pub expanded: usize,
}

impl RouteOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.kind, RouteKind::Fallback(_))
    }

    pub fn length(&self) -> f32 {
        path_length(&self.points)
    }

    pub fn bends(&self) -> usize {
        bend_count(&self.points)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn route(&self, request: &RouteRequest) -> Vec<Point> {
        self.route_detailed(request).points
    }

    pub fn route_detailed(&self, request: &RouteRequest) -> RouteOutcome {
        let start = request.start.point;
        let end = request.end.point;

        if !start.is_finite() || !end.is_finite() || start == end {
            return self.fallback(request, FallbackReason::Degenerate, 0);
        }

        let obstacles = self.search_obstacles(request);
        if obstacles.is_empty() {
            return self.fallback(request, FallbackReason::NoObstacles, 0);
        }

        let grid = build_grid(&obstacles, request.start, request.end, self.config.clearance);
        let graph = RoutingGraph::from_grid(&grid, start, end);
        let model = CostModel::new(request.start, request.end);
        let space = RouteSearch::new(&graph, &model);

        match astar(&space, graph.start(), model.start_label(), graph.end(), self.config.max_steps) {
            SearchOutcome::Found(found) if found.path.len() >= 2 => {
                let raw: Vec<Point> = found.path.iter().map(|&node| graph.point(node)).collect();
                debug!(
                    "routed {} -> {} through {} grid points ({} bends, {} expanded)",
                    fmt_point(start),
                    fmt_point(end),
                    raw.len(),
                    found.label.bends,
                    found.expanded
                );
                RouteOutcome {
                    points: self.finish(&raw),
                    kind: RouteKind::Searched,
                    expanded: found.expanded,
                }
            }
            SearchOutcome::Found(found) => {
                self.fallback(request, FallbackReason::Degenerate, found.expanded)
            }
            SearchOutcome::NoPath { expanded } => {
                self.fallback(request, FallbackReason::NoPath, expanded)
            }
            SearchOutcome::BudgetExhausted { expanded } => {
                self.fallback(request, FallbackReason::BudgetExhausted, expanded)
            }
        }
    }

    /// The grid a request would be searched on, with the same obstacle
    /// filtering as [`Router::route`].
    pub fn grid(&self, request: &RouteRequest) -> Grid {
        let obstacles = self.search_obstacles(request);
        build_grid(&obstacles, request.start, request.end, self.config.clearance)
    }

    /// Active obstacles, grown to whole units when the result is pixel-aligned
    /// so that rounding can move a lane onto a boundary but never past one.
    fn search_obstacles(&self, request: &RouteRequest) -> Vec<Rect> {
        let obstacles = request.active_obstacles();
        if self.config.pixel_align {
            obstacles.iter().map(Rect::snapped_outward).collect()
        } else {
            obstacles
        }
    }

    fn fallback(&self, request: &RouteRequest, reason: FallbackReason, expanded: usize) -> RouteOutcome {
        let start = request.start.point;
        let end = request.end.point;
        debug!(
            "default route {} -> {}: {reason:?} after {expanded} expansions",
            fmt_point(start),
            fmt_point(end)
        );
        RouteOutcome {
            points: self.finish(&default_route(start, end)),
            kind: RouteKind::Fallback(reason),
            expanded,
        }
    }

    fn finish(&self, raw: &[Point]) -> Vec<Point> {
        let simplified = simplify(raw);
        if self.config.pixel_align {
            // Rounding can make neighbours coincide or line up again.
            simplify(&path::pixel_align(&simplified))
        } else {
            simplified
        }
    }
}

/// Route with the default configuration.
pub fn route(request: &RouteRequest) -> Vec<Point> {
    Router::default().route(request)
}

fn fmt_point(p: Point) -> String {
    format!("({}, {})", p.x, p.y)
}
