use trackline::dag::UnitGraph;
use trackline::engine::{Cluster, LayoutOptions, lay_out_graph};
use trackline::errors::TracklineError;
use trackline::types::{ChainId, PathId};
use trackline_test_utils::builders::{GraphBuilder, idx, names};
use trackline_test_utils::init_tracing;

// A -> B -> C, C forks into D and E, both merge into F, F -> G.
// X -> Y is a second, unrelated cluster.
fn two_clusters() -> UnitGraph {
    GraphBuilder::new()
        .unit("G", 0, 1, &[])
        .unit("F", 1, 2, &["G"])
        .unit("D", 2, 4, &["F"])
        .unit("E", 2, 3, &["F"])
        .unit("C", 4, 5, &["D", "E"])
        .unit("B", 5, 6, &["C"])
        .unit("A", 6, 7, &["B"])
        .unit("Y", 0, 3, &[])
        .unit("X", 3, 4, &["Y"])
        .build()
}

#[test]
fn test_cluster_layout_end_to_end() {
    init_tracing();
    let graph = two_clusters();
    let cluster = Cluster::from_ids(&graph, &["A"]).unwrap();

    assert_eq!(cluster.members().len(), 7);
    assert_eq!(cluster.chains().len(), 4);
    assert_eq!(cluster.paths().len(), 2);
    assert_eq!(
        cluster
            .connections()
            .strength_between(&PathId(0), &PathId(1))
            .unwrap(),
        2
    );

    let layout = cluster.layout(LayoutOptions::default()).unwrap();
    assert_eq!(layout.ranking(), &[PathId(0), PathId(1)]);
    assert_eq!(layout.stress_of(PathId(0)).unwrap(), 2);
    assert_eq!(layout.stress_of(PathId(1)).unwrap(), -2);

    let report = layout.report();
    assert_eq!(report.initial_total, 4);
    assert_eq!(report.final_total, 4);

    let rows: Vec<Vec<String>> = cluster
        .rows(&layout)
        .unwrap()
        .iter()
        .map(|p| names(&graph, p.units()))
        .collect();
    assert_eq!(rows, vec![vec!["A", "B", "C", "D", "F", "G"], vec!["E"]]);
}

#[test]
fn test_cluster_lookups() {
    let graph = two_clusters();
    let cluster = Cluster::from_ids(&graph, &["A"]).unwrap();

    assert_eq!(cluster.unit("E").unwrap().id(), "E");
    assert_eq!(cluster.chain_of(idx(&graph, "G")).unwrap(), ChainId(2));
    assert_eq!(cluster.chain(ChainId(3)).unwrap().head(), idx(&graph, "E"));
    assert_eq!(cluster.path_of_chain(ChainId(3)).unwrap(), PathId(1));
    assert_eq!(cluster.path(PathId(1)).unwrap().units(), &[idx(&graph, "E")]);
    assert_eq!(cluster.scores().strain(ChainId(0)).unwrap(), 4);
    assert_eq!(cluster.chain_graph().heads(), &[ChainId(0)]);

    // X exists in the graph but belongs to the other cluster.
    assert!(matches!(
        cluster.unit("X"),
        Err(TracklineError::UnitNotFound(id)) if id == "X"
    ));
    assert!(matches!(
        cluster.chain(ChainId(4)),
        Err(TracklineError::ChainNotFound(ChainId(4)))
    ));
    assert!(matches!(
        cluster.path(PathId(2)),
        Err(TracklineError::PathNotFound(PathId(2)))
    ));
    assert!(matches!(
        cluster.chain_of(idx(&graph, "X")),
        Err(TracklineError::UnitNotFound(_))
    ));
}

#[test]
fn test_lay_out_graph_handles_every_cluster() {
    let graph = two_clusters();
    let clusters = lay_out_graph(&graph, LayoutOptions::default()).unwrap();

    assert_eq!(clusters.len(), 2);
    assert_eq!(names(&graph, clusters[0].0.heads()), vec!["A"]);
    assert_eq!(names(&graph, clusters[1].0.heads()), vec!["X"]);

    let (small, layout) = &clusters[1];
    assert_eq!(layout.ranking(), &[PathId(0)]);
    assert_eq!(layout.stress_of(PathId(0)).unwrap(), 0);
    assert_eq!(
        names(&graph, small.path(PathId(0)).unwrap().units()),
        vec!["X", "Y"]
    );
}

#[test]
fn test_cluster_needs_heads() {
    let graph = two_clusters();
    assert!(matches!(
        Cluster::new(&graph, &[]),
        Err(TracklineError::Empty(_))
    ));
    assert!(matches!(
        Cluster::from_ids(&graph, &["nope"]),
        Err(TracklineError::UnitNotFound(_))
    ));
}

#[test]
fn test_cluster_rejects_dependent_heads() {
    let graph = GraphBuilder::new()
        .point("B", &[])
        .point("A", &["B"])
        .build();

    let err = Cluster::from_ids(&graph, &["A", "B"]).unwrap_err();
    match err {
        TracklineError::MutuallyDependentHeads { dependent, head } => {
            assert_eq!(dependent, "A");
            assert_eq!(head, "B");
        }
        other => panic!("Expected MutuallyDependentHeads, got: {:?}", other),
    }
}

#[test]
fn test_cluster_rejects_missing_dependents() {
    let graph = GraphBuilder::new()
        .point("B", &[])
        .point("A", &["B"])
        .build();

    let err = Cluster::from_ids(&graph, &["B"]).unwrap_err();
    match err {
        TracklineError::UnlistedDependent { unit, dependent } => {
            assert_eq!(unit, "B");
            assert_eq!(dependent, "A");
        }
        other => panic!("Expected UnlistedDependent, got: {:?}", other),
    }
}

#[test]
fn test_cluster_rejects_disconnected_heads() {
    let graph = GraphBuilder::new()
        .point("B", &[])
        .point("A", &["B"])
        .point("D", &[])
        .point("C", &["D"])
        .build();

    assert!(matches!(
        Cluster::from_ids(&graph, &["A", "C"]),
        Err(TracklineError::Disconnected { components: 2 })
    ));
}

#[test]
fn test_extreme_ticks_saturate_instead_of_overflowing() {
    let graph = GraphBuilder::new()
        .unit("low", i64::MIN, -1, &[])
        .unit("high", 0, i64::MAX, &["low"])
        .build();

    let cluster = Cluster::new(&graph, &graph.heads()).unwrap();
    let path = cluster.path(PathId(0)).unwrap();
    assert_eq!(path.presence(), i64::MAX);
    assert_eq!(path.time_span(), i64::MAX);
    assert_eq!(path.density(), 1.0);

    let layout = cluster.layout(LayoutOptions::default()).unwrap();
    assert_eq!(layout.ranking(), &[PathId(0)]);
}
