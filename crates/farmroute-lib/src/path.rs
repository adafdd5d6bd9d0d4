use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::graph::{NodeId, PathGraph};

/// Result of a shortest-path query.
///
/// A missing path is represented by an empty node list and zero cost rather
/// than an error so ranking passes can skip a bad candidate and keep going.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPath {
    pub nodes: Vec<NodeId>,
    pub total_cost: f64,
}

impl ShortestPath {
    /// The empty "no path" value.
    pub fn not_found() -> Self {
        Self {
            nodes: Vec::new(),
            total_cost: 0.0,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Convert the empty value into [`Error::NoPathFound`] for callers that
    /// treat a missing path as a failure.
    pub fn require(self, start: NodeId, end: NodeId) -> Result<Self> {
        if self.is_found() {
            Ok(self)
        } else {
            Err(Error::NoPathFound { start, end })
        }
    }
}

/// Run Dijkstra's algorithm between `start` and `end`.
///
/// Ties between equal-cost paths are broken by fewer hops, then by the
/// lexicographically smaller node sequence, so the result is deterministic
/// for graphs with shortcuts or cycles. Unknown or disconnected nodes yield
/// [`ShortestPath::not_found`].
///
/// # Examples
///
/// ```
/// use farmroute_lib::{build_graph, shortest_path, Coordinate};
///
/// let waypoints = vec![
///     Coordinate::new(0.0, 0.0).unwrap(),
///     Coordinate::new(0.0, 0.5).unwrap(),
///     Coordinate::new(0.0, 1.0).unwrap(),
/// ];
/// let graph = build_graph(&waypoints).unwrap();
/// let path = shortest_path(&graph, 0, 2);
/// assert_eq!(path.nodes, vec![0, 1, 2]);
/// assert!((path.total_cost - graph.total_weight()).abs() < 1e-9);
/// ```
pub fn shortest_path(graph: &PathGraph, start: NodeId, end: NodeId) -> ShortestPath {
    if !graph.contains(start) || !graph.contains(end) {
        tracing::debug!(
            start,
            end,
            nodes = graph.node_count(),
            "shortest path requested for a node outside the graph"
        );
        return ShortestPath::not_found();
    }

    if start == end {
        return ShortestPath {
            nodes: vec![start],
            total_cost: 0.0,
        };
    }

    let mut labels: Vec<Option<Label>> = vec![None; graph.node_count()];
    let mut settled = vec![false; graph.node_count()];
    let mut queue = BinaryHeap::new();

    labels[start] = Some(Label {
        cost: 0.0,
        hops: 0,
        parent: None,
    });
    queue.push(QueueEntry::new(start, 0.0, 0));

    while let Some(entry) = queue.pop() {
        if settled[entry.node] {
            continue;
        }
        let Some(current) = labels[entry.node] else {
            continue;
        };
        if current.cost.total_cmp(&entry.cost.0) != Ordering::Equal || current.hops != entry.hops
        {
            continue;
        }
        settled[entry.node] = true;

        if entry.node == end {
            return ShortestPath {
                nodes: reconstruct_path(&labels, end),
                total_cost: current.cost,
            };
        }

        for neighbour in graph.neighbours(entry.node) {
            let next = neighbour.target;
            if settled[next] {
                continue;
            }

            let candidate = Label {
                cost: current.cost + neighbour.weight,
                hops: current.hops + 1,
                parent: Some(entry.node),
            };

            let improves = match labels[next] {
                None => true,
                Some(existing) => match candidate.cmp_cost(&existing) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    Ordering::Equal => prefers_parent(&labels, entry.node, existing.parent),
                },
            };

            if improves {
                let push = labels[next].map_or(true, |existing| {
                    candidate.cmp_cost(&existing) != Ordering::Equal
                });
                labels[next] = Some(candidate);
                if push {
                    queue.push(QueueEntry::new(next, candidate.cost, candidate.hops));
                }
            }
        }
    }

    tracing::debug!(start, end, "no path between nodes");
    ShortestPath::not_found()
}

/// Map a node path back onto the waypoints the graph was built from.
///
/// Node ids outside `waypoints` are skipped.
pub fn path_coordinates(waypoints: &[Coordinate], path: &ShortestPath) -> Vec<Coordinate> {
    path.nodes
        .iter()
        .filter_map(|&node| waypoints.get(node).copied())
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Label {
    cost: f64,
    hops: usize,
    parent: Option<NodeId>,
}

impl Label {
    fn cmp_cost(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.hops.cmp(&other.hops))
    }
}

/// On an exact cost/hop tie, keep the parent whose path sorts first.
///
/// Both parents are settled, so their paths are final and of equal length.
fn prefers_parent(labels: &[Option<Label>], candidate: NodeId, existing: Option<NodeId>) -> bool {
    let Some(existing) = existing else {
        return false;
    };
    reconstruct_path(labels, candidate) < reconstruct_path(labels, existing)
}

fn reconstruct_path(labels: &[Option<Label>], goal: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        current = labels[node].and_then(|label| label.parent);
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
    hops: usize,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64, hops: usize) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            hops,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by (cost, hops).
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
