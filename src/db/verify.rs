//! Consistency verification between the route store and the closure index.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::db::Db;
use crate::model::AirportId;
use crate::types::Result;

/// Outcome of a closure verification pass.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    /// Number of closure rows inspected.
    pub closure_rows: u64,
    /// Number of routes inspected.
    pub routes: u64,
    /// Human-readable descriptions of every mismatch found.
    pub issues: Vec<String>,
    /// True when the closure index is exactly the transitive closure of the
    /// route store.
    pub success: bool,
}

impl Db {
    /// Recomputes the transitive closure of the route store by traversal and
    /// compares it against the stored closure index.
    ///
    /// This is the slow path the closure index exists to avoid; it is meant
    /// for offline verification, not for serving queries.
    pub fn verify_closure(&self) -> Result<VerifyReport> {
        let mut children: HashMap<AirportId, Vec<(AirportId, char)>> = HashMap::new();
        let mut endpoints: BTreeSet<AirportId> = BTreeSet::new();
        let mut route_count = 0u64;
        {
            let mut stmt = self
                .conn
                .prepare("SELECT parent_id, child_id, position FROM routes")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let parent: AirportId = row.get(0)?;
                let child: AirportId = row.get(1)?;
                let letter: String = row.get(2)?;
                children
                    .entry(parent)
                    .or_default()
                    .push((child, letter.chars().next().unwrap_or('?')));
                endpoints.insert(parent);
                endpoints.insert(child);
                route_count += 1;
            }
        }

        // Expected closure: one self-row per endpoint plus every directed
        // path, rebuilt by walking down from each endpoint.
        let mut expected: BTreeSet<(AirportId, AirportId, u32, String)> = BTreeSet::new();
        for &start in &endpoints {
            expected.insert((start, start, 0, String::new()));
            let mut stack = vec![(start, 0u32, String::new())];
            while let Some((node, depth, path)) = stack.pop() {
                if let Some(next) = children.get(&node) {
                    for &(child, letter) in next {
                        let mut child_path = path.clone();
                        child_path.push(letter);
                        expected.insert((start, child, depth + 1, child_path.clone()));
                        stack.push((child, depth + 1, child_path));
                    }
                }
            }
        }

        let mut actual: BTreeSet<(AirportId, AirportId, u32, String)> = BTreeSet::new();
        for row in self.closure_rows()? {
            actual.insert((row.ancestor, row.descendant, row.depth, row.path));
        }

        let mut issues = Vec::new();
        for missing in expected.difference(&actual) {
            issues.push(format!(
                "missing closure row: ancestor={} descendant={} depth={} path={:?}",
                missing.0, missing.1, missing.2, missing.3
            ));
        }
        for stale in actual.difference(&expected) {
            issues.push(format!(
                "unexpected closure row: ancestor={} descendant={} depth={} path={:?}",
                stale.0, stale.1, stale.2, stale.3
            ));
        }

        Ok(VerifyReport {
            closure_rows: actual.len() as u64,
            routes: route_count,
            success: issues.is_empty(),
            issues,
        })
    }
}
