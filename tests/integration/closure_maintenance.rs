//! Closure index maintenance across insertion orders and handles.

use hubtree::{Db, HubError, Position};
use tempfile::tempdir;

#[test]
fn bottom_up_insertion_still_yields_complete_closure() {
    let mut db = Db::open_in_memory().expect("open db");
    for code in ["JFK", "LAX", "SFO", "SEA"] {
        db.create_airport(code).expect("create airport");
    }

    // Build the chain leaves-first: each insertion attaches an existing
    // subtree root as the child, so the maintenance step has to extend the
    // paths of every ancestor, not just the direct parent.
    db.add_route("SFO", "SEA", Position::Left, 120)
        .expect("add SFO->SEA");
    db.add_route("LAX", "SFO", Position::Left, 90)
        .expect("add LAX->SFO");
    db.add_route("JFK", "LAX", Position::Left, 300)
        .expect("add JFK->LAX");

    // Attaching JFK above the existing LAX subtree makes the entire spine
    // reachable from JFK in that one insertion.
    let second = db.find_nth_node("JFK", Position::Left, 2).expect("query");
    assert_eq!(second.map(|a| a.code), Some("SFO".to_string()));
    let third = db.find_nth_node("JFK", Position::Left, 3).expect("query");
    assert_eq!(third.map(|a| a.code), Some("SEA".to_string()));

    let report = db.verify_closure().expect("verify");
    assert!(report.success, "issues: {:?}", report.issues);
}

#[test]
fn merging_two_subtrees_joins_both_closure_sides() {
    let mut db = Db::open_in_memory().expect("open db");
    for code in ["A", "B", "C", "D"] {
        db.create_airport(code).expect("create airport");
    }
    // Two disjoint trees: A -> B and C -> D.
    db.add_route("A", "B", Position::Left, 60).expect("add A->B");
    db.add_route("C", "D", Position::Right, 60).expect("add C->D");

    // Attaching C under B must create rows for every (ancestor of B,
    // descendant of C) pair, paths joined through the new step.
    db.add_route("B", "C", Position::Right, 60).expect("add B->C");

    let row = db
        .closure_row("A", "D")
        .expect("query")
        .expect("A reaches D");
    assert_eq!(row.depth, 3);
    assert_eq!(row.path, "LRR");

    let report = db.verify_closure().expect("verify");
    assert!(report.success, "issues: {:?}", report.issues);
}

#[test]
fn every_insertion_keeps_depth_equal_to_path_length() {
    let mut db = Db::open_in_memory().expect("open db");
    let codes = ["R0", "N1", "N2", "N3", "N4", "N5", "N6"];
    for code in codes {
        db.create_airport(code).expect("create airport");
    }

    let edges = [
        ("R0", "N1", Position::Left, 10),
        ("R0", "N2", Position::Right, 20),
        ("N1", "N3", Position::Left, 30),
        ("N1", "N4", Position::Right, 40),
        ("N2", "N5", Position::Left, 50),
        ("N3", "N6", Position::Right, 60),
    ];
    for (parent, child, position, duration) in edges {
        db.add_route(parent, child, position, duration)
            .expect("add route");
        for row in db.closure_rows().expect("dump") {
            assert_eq!(row.depth as usize, row.path.len());
            assert!(row.path.chars().all(|c| c == 'L' || c == 'R'));
        }
    }

    // Mixed path spot check: R0 -> N6 goes L, L, R.
    let row = db
        .closure_row("R0", "N6")
        .expect("query")
        .expect("reachable");
    assert_eq!(row.path, "LLR");

    let report = db.verify_closure().expect("verify");
    assert!(report.success, "issues: {:?}", report.issues);
}

#[test]
fn concurrent_handles_see_committed_routes_only() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("hubtree.db");

    let mut writer = Db::open(&path).expect("open writer");
    for code in ["JFK", "LAX", "ORD"] {
        writer.create_airport(code).expect("create airport");
    }
    writer
        .add_route("JFK", "LAX", Position::Left, 300)
        .expect("add JFK->LAX");

    let reader = Db::open(&path).expect("open reader");
    let first = reader
        .find_nth_node("JFK", Position::Left, 1)
        .expect("read committed route");
    assert_eq!(first.map(|a| a.code), Some("LAX".to_string()));

    // A second writer loses the race for the occupied slot with a domain
    // error, not index corruption.
    let mut second_writer = Db::open(&path).expect("open second writer");
    let err = second_writer
        .add_route("JFK", "ORD", Position::Left, 150)
        .expect_err("slot taken");
    assert!(matches!(err, HubError::ConstraintViolation(_)));

    let report = reader.verify_closure().expect("verify");
    assert!(report.success, "issues: {:?}", report.issues);
}
