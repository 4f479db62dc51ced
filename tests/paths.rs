use std::time::{Duration, Instant};

use trackline::chain::{ChainGraph, ChainSet, StrainScores};
use trackline::dag::UnitGraph;
use trackline::errors::TracklineError;
use trackline::path::{Candidate, Path, PathSet};
use trackline::types::{ChainId, PathId};
use trackline_test_utils::builders::{GraphBuilder, idx, names};
use trackline_test_utils::init_tracing;

fn assemble(graph: &UnitGraph) -> (ChainSet, PathSet) {
    let chains = ChainSet::decompose(graph, &graph.heads()).unwrap();
    let chain_graph = ChainGraph::new(graph, &chains).unwrap();
    let scores = StrainScores::new(graph, &chains, &chain_graph).unwrap();
    let paths = PathSet::assemble(graph, &chains, &chain_graph, &scores).unwrap();
    (chains, paths)
}

fn path_names(graph: &UnitGraph, paths: &PathSet) -> Vec<Vec<String>> {
    paths.paths().iter().map(|p| names(graph, p.units())).collect()
}

// A -> B -> C, C forks into D and E, both merge into F, F -> G.
fn forked_graph() -> UnitGraph {
    GraphBuilder::new()
        .unit("G", 0, 1, &[])
        .unit("F", 1, 2, &["G"])
        .unit("D", 2, 4, &["F"])
        .unit("E", 2, 3, &["F"])
        .unit("C", 4, 5, &["D", "E"])
        .unit("B", 5, 6, &["C"])
        .unit("A", 6, 7, &["B"])
        .build()
}

#[test]
fn test_denser_branch_is_taken_first() {
    init_tracing();
    let graph = forked_graph();
    let (chains, paths) = assemble(&graph);

    // Both branches score the same; D fills its slot better than E does.
    assert_eq!(
        path_names(&graph, &paths),
        vec![vec!["A", "B", "C", "D", "F", "G"], vec!["E"]]
    );

    let main = paths.path(PathId(0)).unwrap();
    assert_eq!(main.chains(), &[ChainId(0), ChainId(1), ChainId(2)]);
    assert_eq!(main.presence(), 7);
    assert_eq!(main.initial_start(), 0);
    assert_eq!(main.end(), 7);
    assert_eq!(main.density(), 1.0);
    assert_eq!(main.tracks().len(), 1);

    // Every chain ends up in exactly one path.
    for chain in chains.ids() {
        let owner = paths.path_of_chain(chain).unwrap();
        assert!(paths.path(owner).unwrap().chains().contains(&chain));
    }
    assert_eq!(paths.path_of_unit(idx(&graph, "E")), Some(PathId(1)));
}

// Diamond: T depends on L and R, both depend on B.
fn diamond(first: (&str, i64, i64), second: (&str, i64, i64)) -> UnitGraph {
    GraphBuilder::new()
        .unit("B", 0, 1, &[])
        .unit(first.0, first.1, first.2, &["B"])
        .unit(second.0, second.1, second.2, &["B"])
        .unit("T", 11, 12, &["L", "R"])
        .build()
}

#[test]
fn test_equal_density_falls_back_to_presence() {
    // T,R,B: presence 10 over 12. T,L,B: presence 20 over 24.
    let graph = diamond(("R", 2, 10), ("L", -12, 6));
    let (_, paths) = assemble(&graph);

    assert_eq!(
        path_names(&graph, &paths),
        vec![vec!["T", "L", "B"], vec!["R"]]
    );
}

#[test]
fn test_higher_density_wins() {
    // T,L,B: presence 17 over 24. T,R,B: presence 10 over 12.
    let graph = diamond(("L", -12, 3), ("R", 2, 10));
    let (_, paths) = assemble(&graph);

    assert_eq!(
        path_names(&graph, &paths),
        vec![vec!["T", "R", "B"], vec!["L"]]
    );
}

#[test]
fn test_overlapping_units_split_into_tracks() {
    let graph = GraphBuilder::new()
        .unit("X", 0, 5, &[])
        .unit("Y", 3, 6, &["X"])
        .unit("Z", 6, 8, &["Y"])
        .build();
    let (_, paths) = assemble(&graph);

    assert_eq!(paths.len(), 1);
    let path = paths.path(PathId(0)).unwrap();
    let tracks: Vec<Vec<String>> = path
        .tracks()
        .iter()
        .map(|t| names(&graph, t.units()))
        .collect();
    // Z starts when X has already finished, so it reuses the first track.
    assert_eq!(tracks, vec![vec!["X", "Z"], vec!["Y"]]);
}

#[test]
fn test_path_requires_direct_links_between_chains() {
    let graph = forked_graph();
    let (chains, _) = assemble(&graph);

    let d = chains.chain(ChainId(1)).unwrap();
    let e = chains.chain(ChainId(3)).unwrap();
    let err = Path::new(&graph, PathId(0), &[d, e]).unwrap_err();
    assert!(matches!(
        err,
        TracklineError::BrokenPath { ref tail, ref head } if tail == "D" && head == "E"
    ));

    assert!(matches!(
        Path::new(&graph, PathId(0), &[]),
        Err(TracklineError::Empty(_))
    ));
}

#[test]
fn test_candidate_rank_order() {
    let base = Candidate {
        chains: vec![ChainId(0)],
        familiarity: 2,
        unfamiliarity: 1,
        strain: 5,
        density: 0.5,
        presence: 10,
    };

    let more_familiar = Candidate {
        familiarity: 3,
        unfamiliarity: 9,
        ..base.clone()
    };
    assert!(more_familiar.rank(&base).is_lt());

    let less_contended = Candidate {
        unfamiliarity: 0,
        strain: 0,
        ..base.clone()
    };
    assert!(less_contended.rank(&base).is_lt());

    let more_strained = Candidate {
        strain: 6,
        density: 0.1,
        ..base.clone()
    };
    assert!(more_strained.rank(&base).is_lt());

    let denser = Candidate {
        density: 0.75,
        presence: 1,
        ..base.clone()
    };
    assert!(denser.rank(&base).is_lt());

    let longer = Candidate {
        presence: 11,
        ..base.clone()
    };
    assert!(longer.rank(&base).is_lt());
    assert!(base.rank(&base.clone()).is_eq());
}

#[test]
fn test_unknown_path_lookups() {
    let graph = forked_graph();
    let (_, paths) = assemble(&graph);
    assert!(matches!(
        paths.path(PathId(5)),
        Err(TracklineError::PathNotFound(PathId(5)))
    ));
    assert!(matches!(
        paths.path_of_chain(ChainId(8)),
        Err(TracklineError::ChainNotFound(ChainId(8)))
    ));
}

// k stacked diamonds: n(i) depends on l(i) and r(i), both depend on n(i+1).
// Every fork is an exact tie, so each head has 2^k equally scored walks.
fn ladder(k: usize) -> UnitGraph {
    let mut builder = GraphBuilder::new();
    let level_start = |i: usize| 2 * (k - i) as i64;
    builder = builder.unit(&format!("n{k:02}"), 0, 1, &[]);
    for i in (0..k).rev() {
        let below = format!("n{:02}", i + 1);
        let side_start = level_start(i) - 1;
        builder = builder
            .unit(&format!("l{i:02}"), side_start, side_start + 1, &[below.as_str()])
            .unit(&format!("r{i:02}"), side_start, side_start + 1, &[below.as_str()]);
        let (left, right) = (format!("l{i:02}"), format!("r{i:02}"));
        builder = builder.unit(
            &format!("n{i:02}"),
            level_start(i),
            level_start(i) + 1,
            &[left.as_str(), right.as_str()],
        );
    }
    builder.build()
}

#[test]
fn test_tied_ladder_assembles_without_enumerating_every_walk() {
    let graph = ladder(20);
    assert_eq!(graph.len(), 61);

    let started = Instant::now();
    let (chains, paths) = assemble(&graph);
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "assembly took {:?}",
        started.elapsed()
    );

    assert_eq!(chains.len(), 61);
    assert_eq!(paths.len(), 21);

    // Ties resolve to the walk a lowest-id-first search finds first.
    let mut expected = Vec::new();
    for i in 0..20 {
        expected.push(format!("n{i:02}"));
        expected.push(format!("l{i:02}"));
    }
    expected.push("n20".to_string());
    assert_eq!(names(&graph, paths.path(PathId(0)).unwrap().units()), expected);

    for path in &paths.paths()[1..] {
        let units = names(&graph, path.units());
        assert_eq!(units.len(), 1);
        assert!(units[0].starts_with('r'), "unexpected side row {units:?}");
    }
}

#[test]
fn test_small_ladder_picks_the_same_walk() {
    let graph = ladder(2);
    let (_, paths) = assemble(&graph);
    assert_eq!(
        path_names(&graph, &paths),
        vec![
            vec!["n00", "l00", "n01", "l01", "n02"],
            vec!["r00"],
            vec!["r01"],
        ]
    );
}
