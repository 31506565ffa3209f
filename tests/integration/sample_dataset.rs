//! End-to-end scenario over the demo dataset.

use hubtree::cli::run_seed;
use hubtree::{Db, HubError, Position};
use tempfile::tempdir;

fn seeded_db() -> (tempfile::TempDir, Db) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("hubtree.db");
    let mut db = Db::open(&path).expect("open db");
    run_seed(&mut db).expect("seed demo data");
    (dir, db)
}

#[test]
fn nth_node_answers_match_the_demo_tree() {
    let (_dir, db) = seeded_db();

    let second_left = db
        .find_nth_node("JFK", Position::Left, 2)
        .expect("query LL");
    assert_eq!(second_left.map(|a| a.code), Some("SFO".to_string()));

    let first_right = db
        .find_nth_node("LAX", Position::Right, 1)
        .expect("query R");
    assert_eq!(first_right.map(|a| a.code), Some("DEN".to_string()));

    let third_left = db
        .find_nth_node("JFK", Position::Left, 3)
        .expect("query LLL");
    assert_eq!(third_left.map(|a| a.code), Some("SEA".to_string()));

    // The pure-left chain from JFK ends at SEA.
    assert!(db
        .find_nth_node("JFK", Position::Left, 4)
        .expect("query LLLL")
        .is_none());
}

#[test]
fn longest_route_is_den_to_mia() {
    let (_dir, db) = seeded_db();

    let longest = db.longest_route().expect("query").expect("routes exist");
    assert_eq!(longest.parent.code, "DEN");
    assert_eq!(longest.child.code, "MIA");
    assert_eq!(longest.duration_minutes, 420);

    let from_ord = db
        .longest_route_from("ORD")
        .expect("query")
        .expect("ORD has routes");
    assert_eq!(from_ord.child.code, "DFW");
    assert_eq!(from_ord.duration_minutes, 180);
}

#[test]
fn shortest_route_between_is_direct_only() {
    let (_dir, db) = seeded_db();

    let direct = db
        .shortest_route_between("SFO", "LAS")
        .expect("query")
        .expect("direct route exists");
    assert_eq!(direct.duration_minutes, 90);
    assert_eq!(direct.position, Position::Right);

    // SEA is below SFO but not adjacent to JFK.
    assert!(db
        .shortest_route_between("JFK", "SEA")
        .expect("query")
        .is_none());

    let err = db
        .shortest_route_between("JFK", "XYZ")
        .expect_err("unknown destination");
    assert!(matches!(err, HubError::NotFound(_)));
}

#[test]
fn closure_paths_encode_exact_step_sequences() {
    let (_dir, db) = seeded_db();

    let cases = [
        ("JFK", "SFO", "LL"),
        ("JFK", "SEA", "LLL"),
        ("JFK", "MIA", "LRR"),
        ("JFK", "BOS", "RLL"),
        ("ORD", "BOS", "LL"),
        ("LAX", "PHX", "RL"),
    ];
    for (ancestor, descendant, path) in cases {
        let row = db
            .closure_row(ancestor, descendant)
            .expect("query closure")
            .unwrap_or_else(|| panic!("{ancestor} should reach {descendant}"));
        assert_eq!(row.path, path, "{ancestor} -> {descendant}");
        assert_eq!(row.depth as usize, path.len());
    }

    // ATL -> MIA was rejected during seeding, so ATL reaches nothing.
    assert!(db.closure_row("ATL", "MIA").expect("query").is_none());
    assert!(db.descendants_of("ATL").expect("query").is_empty());
}

#[test]
fn demo_tree_passes_verification() {
    let (_dir, db) = seeded_db();
    let report = db.verify_closure().expect("verify");
    assert!(report.success, "issues: {:?}", report.issues);
    assert_eq!(report.routes, 11);
    // 12 airports participate in routes plus one closure row per directed
    // reachable pair.
    let stats = db.stats().expect("stats");
    assert_eq!(stats.airports, 12);
    assert_eq!(stats.routes, 11);
}

#[test]
fn data_survives_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("hubtree.db");
    {
        let mut db = Db::open(&path).expect("open db");
        run_seed(&mut db).expect("seed");
    }

    let db = Db::open(&path).expect("reopen db");
    let second_left = db
        .find_nth_node("JFK", Position::Left, 2)
        .expect("query after reopen");
    assert_eq!(second_left.map(|a| a.code), Some("SFO".to_string()));
}
