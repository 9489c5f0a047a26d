//! Generic best-first (A*) search with explicit relaxation.
//!
//! The search owns all per-node state: a best-known label per node, the
//! predecessor map, and the set of settled nodes. A [`SearchSpace`] only
//! describes how a label extends across one edge, so node state is never
//! mutated as a side effect of asking for a cost.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::hash::Hash;

use log::trace;

pub trait SearchSpace {
    type Node: Copy + Eq + Hash + Ord;
    type Label: Clone;

    fn neighbors(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Label that `to` would carry when reached from `from`, or `None` if the
    /// step is forbidden.
    fn extend(&self, from: Self::Node, label: &Self::Label, to: Self::Node) -> Option<Self::Label>;

    fn cost(&self, label: &Self::Label) -> f32;

    fn heuristic(&self, node: Self::Node) -> f32;
}

#[derive(Debug, Clone)]
pub struct Found<N, L> {
    pub path: Vec<N>,
    pub label: L,
    pub expanded: usize,
}

#[derive(Debug, Clone)]
pub enum SearchOutcome<N, L> {
    Found(Found<N, L>),
    NoPath { expanded: usize },
    BudgetExhausted { expanded: usize },
}

#[derive(Debug, Clone, Copy)]
struct Entry<N> {
    est: f32,
    cost: f32,
    node: N,
}

impl<N: Ord> Ord for Entry<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .est
            .total_cmp(&self.est)
            .then_with(|| other.cost.total_cmp(&self.cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl<N: Ord> PartialOrd for Entry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord> PartialEq for Entry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Ord> Eq for Entry<N> {}

/// Search from `start` to `goal`. Expands at most `max_steps` nodes.
pub fn astar<S: SearchSpace>(
    space: &S,
    start: S::Node,
    start_label: S::Label,
    goal: S::Node,
    max_steps: usize,
) -> SearchOutcome<S::Node, S::Label> {
    let mut best: HashMap<S::Node, S::Label> = HashMap::new();
    let mut came_from: HashMap<S::Node, S::Node> = HashMap::new();
    let mut settled: HashSet<S::Node> = HashSet::new();
    let mut heap = BinaryHeap::new();

    let start_cost = space.cost(&start_label);
    heap.push(Entry {
        est: start_cost + space.heuristic(start),
        cost: start_cost,
        node: start,
    });
    best.insert(start, start_label);

    let mut expanded = 0usize;
    while let Some(Entry { cost, node, .. }) = heap.pop() {
        if settled.contains(&node) {
            continue;
        }
        let Some(label) = best.get(&node).cloned() else {
            continue;
        };
        if cost > space.cost(&label) {
            continue;
        }
        settled.insert(node);

        if node == goal {
            let path = reconstruct(&came_from, goal);
            trace!("search reached goal after expanding {expanded} nodes");
            return SearchOutcome::Found(Found {
                path,
                label,
                expanded,
            });
        }

        expanded += 1;
        if expanded > max_steps {
            return SearchOutcome::BudgetExhausted { expanded };
        }

        for next in space.neighbors(node) {
            if settled.contains(&next) {
                continue;
            }
            let Some(candidate) = space.extend(node, &label, next) else {
                continue;
            };
            let candidate_cost = space.cost(&candidate);
            if !candidate_cost.is_finite() {
                continue;
            }
            let improves = best
                .get(&next)
                .is_none_or(|current| candidate_cost < space.cost(current));
            if !improves {
                continue;
            }
            came_from.insert(next, node);
            heap.push(Entry {
                est: candidate_cost + space.heuristic(next),
                cost: candidate_cost,
                node: next,
            });
            best.insert(next, candidate);
        }
    }

    SearchOutcome::NoPath { expanded }
}

fn reconstruct<N: Copy + Eq + Hash>(came_from: &HashMap<N, N>, goal: N) -> Vec<N> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
