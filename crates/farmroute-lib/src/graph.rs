use std::sync::Arc;

use crate::error::{Error, Result};
use crate::geo::{haversine_km, Coordinate};

/// Node identifier: the index of the waypoint the node was built from.
pub type NodeId = usize;

/// Undirected weighted edge as supplied to [`PathGraph::from_edges`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

/// Half-edge stored in the adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub target: NodeId,
    pub weight: f64,
}

/// Weighted undirected graph over waypoint indices.
///
/// Immutable once built; cloning shares the adjacency storage.
#[derive(Debug, Clone)]
pub struct PathGraph {
    edges: Arc<Vec<Edge>>,
    adjacency: Arc<Vec<Vec<Neighbour>>>,
}

impl PathGraph {
    /// Build a graph from an explicit edge list.
    ///
    /// Used for graphs that are not plain chains, e.g. when shortcut edges from
    /// alternate geometries are added. Every edge is stored in both directions.
    pub fn from_edges(node_count: usize, edges: Vec<Edge>) -> Result<Self> {
        if node_count == 0 {
            return Err(Error::EmptyGraph);
        }

        let mut adjacency = vec![Vec::new(); node_count];
        for edge in &edges {
            let valid = edge.from < node_count
                && edge.to < node_count
                && edge.weight.is_finite()
                && edge.weight >= 0.0;
            if !valid {
                return Err(Error::InvalidEdge {
                    from: edge.from,
                    to: edge.to,
                    weight: edge.weight,
                    node_count,
                });
            }

            adjacency[edge.from].push(Neighbour {
                target: edge.to,
                weight: edge.weight,
            });
            if edge.from != edge.to {
                adjacency[edge.to].push(Neighbour {
                    target: edge.from,
                    weight: edge.weight,
                });
            }
        }

        for neighbours in &mut adjacency {
            neighbours.sort_by(|a, b| {
                a.target
                    .cmp(&b.target)
                    .then_with(|| a.weight.total_cmp(&b.weight))
            });
        }

        Ok(Self {
            edges: Arc::new(edges),
            adjacency: Arc::new(adjacency),
        })
    }

    /// Number of nodes (equals the source waypoint count for chain graphs).
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether `node` is a valid identifier in this graph.
    pub fn contains(&self, node: NodeId) -> bool {
        node < self.node_count()
    }

    /// Return the neighbours for a given node, sorted by node id.
    pub fn neighbours(&self, node: NodeId) -> &[Neighbour] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sum of all edge weights.
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|edge| edge.weight).sum()
    }
}

/// Build a chain graph from an ordered waypoint sequence.
///
/// Node `i` corresponds to `waypoints[i]` and each consecutive pair is joined
/// by an edge weighted with the haversine distance. Fails with
/// [`Error::TooFewWaypoints`] for fewer than two waypoints and with
/// [`Error::InvalidCoordinate`] for any out-of-range waypoint.
///
/// # Examples
///
/// ```
/// use farmroute_lib::{build_graph, Coordinate};
///
/// let waypoints = vec![
///     Coordinate::new(30.0, 78.0).unwrap(),
///     Coordinate::new(30.1, 78.0).unwrap(),
///     Coordinate::new(30.2, 78.1).unwrap(),
/// ];
/// let graph = build_graph(&waypoints).unwrap();
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// ```
pub fn build_graph(waypoints: &[Coordinate]) -> Result<PathGraph> {
    if waypoints.len() < 2 {
        return Err(Error::TooFewWaypoints {
            count: waypoints.len(),
        });
    }
    for waypoint in waypoints {
        waypoint.validate()?;
    }

    let edges = waypoints
        .windows(2)
        .enumerate()
        .map(|(index, pair)| Edge {
            from: index,
            to: index + 1,
            weight: haversine_km(pair[0], pair[1]),
        })
        .collect();

    PathGraph::from_edges(waypoints.len(), edges)
}
