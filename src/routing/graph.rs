use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};

use crate::geometry::{Point, normalize_zero};

use super::grid::Grid;

/// Bit-exact identity of a grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey(u32, u32);

impl From<Point> for PointKey {
    fn from(point: Point) -> Self {
        PointKey(normalize_zero(point.x).to_bits(), normalize_zero(point.y).to_bits())
    }
}

/// Searchable view of a [`Grid`]: one node per grid point that carries an
/// edge, plus both endpoints. Edge weights are segment lengths.
#[derive(Debug, Clone)]
pub struct RoutingGraph {
    graph: UnGraph<Point, f32>,
    index: HashMap<PointKey, NodeIndex>,
    start: NodeIndex,
    end: NodeIndex,
}

impl RoutingGraph {
    pub fn from_grid(grid: &Grid, start: Point, end: Point) -> Self {
        let mut graph = UnGraph::with_capacity(grid.xs.len() * grid.ys.len(), grid.edges.len() + 2);
        let mut index = HashMap::new();
        let start = ensure_node(&mut graph, &mut index, start);
        let end = ensure_node(&mut graph, &mut index, end);
        for edge in grid.all_edges() {
            if edge.from == edge.to {
                continue;
            }
            let a = ensure_node(&mut graph, &mut index, edge.from);
            let b = ensure_node(&mut graph, &mut index, edge.to);
            graph.update_edge(a, b, edge.length());
        }
        Self {
            graph,
            index,
            start,
            end,
        }
    }

    pub fn start(&self) -> NodeIndex {
        self.start
    }

    pub fn end(&self) -> NodeIndex {
        self.end
    }

    pub fn point(&self, node: NodeIndex) -> Point {
        self.graph[node]
    }

    pub fn node_at(&self, point: Point) -> Option<NodeIndex> {
        self.index.get(&PointKey::from(point)).copied()
    }

    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(node)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn ensure_node(
    graph: &mut UnGraph<Point, f32>,
    index: &mut HashMap<PointKey, NodeIndex>,
    point: Point,
) -> NodeIndex {
    *index
        .entry(PointKey::from(point))
        .or_insert_with(|| graph.add_node(point))
}
