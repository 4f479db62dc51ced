use trackline::chain::{ChainGraph, ChainSet, StrainScores};
use trackline::errors::TracklineError;
use trackline::path::PathSet;
use trackline::stress::ConnectionMatrix;
use trackline::types::PathId;
use trackline_test_utils::builders::GraphBuilder;

#[test]
fn test_connect_is_symmetric_and_accumulates() {
    let mut matrix = ConnectionMatrix::new(["c", "a", "b"]);
    assert_eq!(matrix.index().ids(), &["a", "b", "c"]);

    matrix.connect_ids(&"a", &"c", 2).unwrap();
    matrix.connect_ids(&"c", &"a", 1).unwrap();

    assert_eq!(matrix.strength_between(&"a", &"c").unwrap(), 3);
    assert_eq!(matrix.strength_between(&"c", &"a").unwrap(), 3);
    assert_eq!(matrix.strength(0, 1).unwrap(), 0);
}

#[test]
fn test_self_connections_are_ignored() {
    let mut matrix = ConnectionMatrix::new([1u8, 2]);
    matrix.connect(0, 0, 5).unwrap();
    assert_eq!(matrix.strength(0, 0).unwrap(), 0);
}

#[test]
fn test_unknown_identities_are_errors() {
    let mut matrix = ConnectionMatrix::new(["a", "b"]);
    assert!(matches!(
        matrix.connect_ids(&"a", &"z", 1),
        Err(TracklineError::IdentityNotFound(_))
    ));
    assert!(matches!(
        matrix.connect(0, 2, 1),
        Err(TracklineError::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn test_from_paths_counts_cross_path_edges_once() {
    // Path 0 is A, B, C, D, F, G; path 1 is the lone E.
    // C -> E and E -> F are the only edges crossing between them.
    let graph = GraphBuilder::new()
        .unit("G", 0, 1, &[])
        .unit("F", 1, 2, &["G"])
        .unit("D", 2, 4, &["F"])
        .unit("E", 2, 3, &["F"])
        .unit("C", 4, 5, &["D", "E"])
        .unit("B", 5, 6, &["C"])
        .unit("A", 6, 7, &["B"])
        .build();
    let chains = ChainSet::decompose(&graph, &graph.heads()).unwrap();
    let chain_graph = ChainGraph::new(&graph, &chains).unwrap();
    let scores = StrainScores::new(&graph, &chains, &chain_graph).unwrap();
    let paths = PathSet::assemble(&graph, &chains, &chain_graph, &scores).unwrap();

    let matrix = ConnectionMatrix::from_paths(&graph, &paths).unwrap();
    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix.strength_between(&PathId(0), &PathId(1)).unwrap(), 2);
    assert_eq!(matrix.strength_between(&PathId(1), &PathId(0)).unwrap(), 2);
    assert_eq!(matrix.strength_between(&PathId(0), &PathId(0)).unwrap(), 0);
}
