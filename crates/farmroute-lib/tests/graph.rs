//! Property tests for the waypoint graph and the shortest-path solver.

use farmroute_lib::geo::path_length_km;
use farmroute_lib::graph::Edge;
use farmroute_lib::path::path_coordinates;
use farmroute_lib::{build_graph, haversine_km, shortest_path, Coordinate, ErrorKind, PathGraph};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0_f64..=90.0, -180.0_f64..=180.0).prop_map(|(latitude, longitude)| Coordinate {
        latitude,
        longitude,
    })
}

fn waypoints() -> impl Strategy<Value = Vec<Coordinate>> {
    prop::collection::vec(coordinate(), 2..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
        prop_assert_eq!(haversine_km(a, b), haversine_km(b, a));
        prop_assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn chain_graph_shape_and_cost(points in waypoints()) {
        let graph = build_graph(&points).expect("valid waypoints");
        prop_assert_eq!(graph.node_count(), points.len());
        prop_assert_eq!(graph.edge_count(), points.len() - 1);

        let last = points.len() - 1;
        let path = shortest_path(&graph, 0, last);
        let expected: Vec<usize> = (0..points.len()).collect();
        prop_assert_eq!(&path.nodes, &expected);

        let naive = graph.total_weight();
        prop_assert!((path.total_cost - naive).abs() <= 1e-9 * naive.max(1.0));
        prop_assert!((path_length_km(&points) - naive).abs() <= 1e-9 * naive.max(1.0));
        prop_assert_eq!(path_coordinates(&points, &path), points.clone());
    }

    #[test]
    fn partial_chain_paths_are_contiguous(points in waypoints(), a in 0usize..40, b in 0usize..40) {
        let graph = build_graph(&points).expect("valid waypoints");
        let (a, b) = (a % points.len(), b % points.len());
        let path = shortest_path(&graph, a, b);
        prop_assert_eq!(path.hop_count(), a.abs_diff(b));
        prop_assert_eq!(path.nodes.first().copied(), Some(a));
        prop_assert_eq!(path.nodes.last().copied(), Some(b));
    }
}

#[test]
fn short_sequences_are_invalid_input() {
    let one = [Coordinate::new(30.0, 78.0).unwrap()];
    assert_eq!(build_graph(&one).unwrap_err().kind(), ErrorKind::InvalidInput);
    assert_eq!(build_graph(&[]).unwrap_err().kind(), ErrorKind::InvalidInput);
}

#[test]
fn shortcut_edges_are_preferred() {
    // Chain 0-1-2-3-4 plus a shortcut 1-3 cheaper than 1-2-3.
    let mut edges: Vec<Edge> = (0..4)
        .map(|i| Edge {
            from: i,
            to: i + 1,
            weight: 10.0,
        })
        .collect();
    edges.push(Edge {
        from: 1,
        to: 3,
        weight: 15.0,
    });
    let graph = PathGraph::from_edges(5, edges).unwrap();

    let path = shortest_path(&graph, 0, 4);
    assert_eq!(path.nodes, vec![0, 1, 3, 4]);
    assert_eq!(path.total_cost, 35.0);
}

#[test]
fn disconnected_nodes_report_no_path_kind() {
    let graph = PathGraph::from_edges(
        3,
        vec![Edge {
            from: 0,
            to: 1,
            weight: 1.0,
        }],
    )
    .unwrap();
    let err = shortest_path(&graph, 0, 2).require(0, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoPathFound);
}
