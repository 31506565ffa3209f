//! Property tests: the closure index always equals the transitive closure of
//! the route store, with exact path encodings.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use proptest::sample::Index;

use hubtree::{Db, HubError, Position};

#[derive(Debug, Clone)]
enum Op {
    /// Create a fresh airport and attach it under an existing one.
    AttachNew { parent: Index, right: bool, duration: u32 },
    /// Create a fresh airport with no routes.
    NewRoot,
    /// Try to link two existing airports; guards may reject it.
    Link { parent: Index, child: Index, right: bool, duration: u32 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<Index>(), any::<bool>(), 1u32..1000).prop_map(|(parent, right, duration)| {
            Op::AttachNew { parent, right, duration }
        }),
        1 => Just(Op::NewRoot),
        2 => (any::<Index>(), any::<Index>(), any::<bool>(), 1u32..1000).prop_map(
            |(parent, child, right, duration)| Op::Link { parent, child, right, duration }
        ),
    ]
}

/// In-test reference model of the forest: child slots per airport.
#[derive(Default)]
struct Model {
    children: HashMap<String, Vec<(String, char)>>,
    participants: BTreeSet<String>,
}

impl Model {
    fn record(&mut self, parent: &str, child: &str, position: Position) {
        self.children
            .entry(parent.to_string())
            .or_default()
            .push((child.to_string(), position.letter()));
        self.participants.insert(parent.to_string());
        self.participants.insert(child.to_string());
    }

    /// Recomputes the expected closure by walking down from every route
    /// participant.
    fn expected_closure(&self) -> BTreeSet<(String, String, u32, String)> {
        let mut expected = BTreeSet::new();
        for start in &self.participants {
            expected.insert((start.clone(), start.clone(), 0, String::new()));
            let mut stack = vec![(start.clone(), 0u32, String::new())];
            while let Some((node, depth, path)) = stack.pop() {
                if let Some(next) = self.children.get(&node) {
                    for (child, letter) in next {
                        let mut child_path = path.clone();
                        child_path.push(*letter);
                        expected.insert((
                            start.clone(),
                            child.clone(),
                            depth + 1,
                            child_path.clone(),
                        ));
                        stack.push((child.clone(), depth + 1, child_path));
                    }
                }
            }
        }
        expected
    }
}

fn position_of(right: bool) -> Position {
    if right {
        Position::Right
    } else {
        Position::Left
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn closure_matches_reference_model(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut db = Db::open_in_memory().expect("open db");
        let mut model = Model::default();
        let mut codes: Vec<String> = Vec::new();

        let mut next_code = {
            let mut counter = 0u32;
            move || {
                let code = format!("A{counter}");
                counter += 1;
                code
            }
        };

        for op in ops {
            match op {
                Op::NewRoot => {
                    let code = next_code();
                    db.create_airport(&code).expect("create airport");
                    codes.push(code);
                }
                Op::AttachNew { parent, right, duration } => {
                    let code = next_code();
                    db.create_airport(&code).expect("create airport");
                    codes.push(code.clone());
                    if codes.len() < 2 {
                        continue;
                    }
                    let parent = parent.get(&codes[..codes.len() - 1]).clone();
                    apply_route(&mut db, &mut model, &parent, &code, right, duration);
                }
                Op::Link { parent, child, right, duration } => {
                    if codes.is_empty() {
                        continue;
                    }
                    let parent = parent.get(&codes).clone();
                    let child = child.get(&codes).clone();
                    apply_route(&mut db, &mut model, &parent, &child, right, duration);
                }
            }
        }

        // Stored closure, with ids resolved back to codes.
        let mut by_id = HashMap::new();
        for airport in db.airports().expect("list airports") {
            by_id.insert(airport.id, airport.code);
        }
        let mut actual = BTreeSet::new();
        for row in db.closure_rows().expect("dump closure") {
            actual.insert((
                by_id[&row.ancestor].clone(),
                by_id[&row.descendant].clone(),
                row.depth,
                row.path,
            ));
        }

        prop_assert_eq!(actual, model.expected_closure());

        let report = db.verify_closure().expect("verify");
        prop_assert!(report.success, "issues: {:?}", report.issues);
    }
}

/// Attempts the insertion on both the database and the model, keeping them in
/// lockstep: the model only records routes the database accepted.
fn apply_route(
    db: &mut Db,
    model: &mut Model,
    parent: &str,
    child: &str,
    right: bool,
    duration: u32,
) {
    let position = position_of(right);
    match db.add_route(parent, child, position, duration) {
        Ok(_) => model.record(parent, child, position),
        Err(HubError::ConstraintViolation(_)) => {}
        Err(err) => panic!("unexpected error: {err}"),
    }
}
