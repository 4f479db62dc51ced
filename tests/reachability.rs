use std::collections::BTreeMap;

use trackline::dag::ReachabilityMatrix;
use trackline::errors::TracklineError;

// Four nodes, declared out of order:
//   d -> b -> a
//   c -> a
fn sample() -> ReachabilityMatrix<&'static str> {
    let deps: BTreeMap<&str, Vec<&str>> = BTreeMap::from([
        ("d", vec!["b"]),
        ("b", vec!["a"]),
        ("c", vec!["a"]),
        ("a", vec![]),
    ]);
    ReachabilityMatrix::new(["d", "c", "b", "a"], |id| {
        deps.get(id).cloned().unwrap_or_default()
    })
}

#[test]
fn test_ids_are_sorted_and_cells_follow_direct_edges() {
    let matrix = sample();
    assert_eq!(matrix.ids(), &["a", "b", "c", "d"]);
    assert_eq!(matrix.len(), 4);

    let (a, b, c, d) = (0, 1, 2, 3);
    assert!(matrix.depends(b, a).unwrap());
    assert!(matrix.depends(c, a).unwrap());
    assert!(matrix.depends(d, b).unwrap());

    // Single step only: d reaches a through b but has no cell for it.
    assert!(!matrix.depends(d, a).unwrap());
    assert!(!matrix.depends(a, b).unwrap());
}

#[test]
fn test_heads_have_empty_columns() {
    let matrix = sample();
    assert_eq!(matrix.heads(), vec!["c", "d"]);
}

#[test]
fn test_heads_of_sub_matrix() {
    let matrix = sample();

    // Dropping d exposes b as a head.
    let b_pos = matrix.position(&"b").unwrap();
    let keep: Vec<usize> = ["a", "b", "c"]
        .iter()
        .map(|id| matrix.position(id).unwrap())
        .collect();
    assert_eq!(matrix.heads_of(&keep).unwrap(), vec!["b", "c"]);

    // Order and duplicates in `keep` do not matter.
    let sub = matrix.sub_matrix(&[b_pos, 0, b_pos]).unwrap();
    assert_eq!(sub.ids(), &["a", "b"]);
    assert!(sub.depends(1, 0).unwrap());
    assert_eq!(sub.heads(), vec!["b"]);
}

#[test]
fn test_dependencies_outside_the_id_set_are_ignored() {
    let matrix = ReachabilityMatrix::new([1u32, 2], |&id| if id == 2 { vec![1, 99] } else { vec![] });
    assert_eq!(matrix.len(), 2);
    assert!(matrix.depends(1, 0).unwrap());
    assert_eq!(matrix.heads(), vec![2]);
}

#[test]
fn test_out_of_range_indices_are_errors() {
    let matrix = sample();
    assert!(matches!(
        matrix.depends(4, 0),
        Err(TracklineError::IndexOutOfRange { index: 4, len: 4 })
    ));
    assert!(matches!(
        matrix.sub_matrix(&[0, 7]),
        Err(TracklineError::IndexOutOfRange { index: 7, len: 4 })
    ));
}
