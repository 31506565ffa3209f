//! Demo dataset seeder.

use serde::Serialize;
use tracing::warn;

use crate::db::Db;
use crate::model::Position;
use crate::types::Result;

const SAMPLE_AIRPORTS: [&str; 12] = [
    "JFK", "LAX", "ORD", "DFW", "DEN", "ATL", "SFO", "SEA", "MIA", "BOS", "LAS", "PHX",
];

const SAMPLE_ROUTES: [(&str, &str, Position, u32); 12] = [
    ("JFK", "LAX", Position::Left, 300),
    ("JFK", "ORD", Position::Right, 150),
    ("LAX", "SFO", Position::Left, 90),
    ("LAX", "DEN", Position::Right, 120),
    ("ORD", "DFW", Position::Left, 180),
    ("ORD", "ATL", Position::Right, 120),
    ("SFO", "SEA", Position::Left, 120),
    ("SFO", "LAS", Position::Right, 90),
    ("DEN", "PHX", Position::Left, 90),
    ("DEN", "MIA", Position::Right, 420),
    ("DFW", "BOS", Position::Left, 210),
    // MIA is already attached under DEN at this point, so this edge is
    // rejected and reported in the summary.
    ("ATL", "MIA", Position::Left, 90),
];

/// Summary from a demo seeding run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedSummary {
    /// Airports created.
    pub airports: u64,
    /// Routes inserted.
    pub routes: u64,
    /// Sample rows rejected by a structural guard, with reasons.
    pub rejected: Vec<String>,
}

/// Populates `db` with the demo airport tree rooted at JFK.
///
/// Airports that already exist are reused; routes that violate a structural
/// guard are skipped and reported, not fatal.
pub fn run_seed(db: &mut Db) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for code in SAMPLE_AIRPORTS {
        match db.create_airport(code) {
            Ok(_) => summary.airports += 1,
            Err(crate::HubError::DuplicateCode(_)) => {}
            Err(err) => return Err(err),
        }
    }

    for (parent, child, position, duration) in SAMPLE_ROUTES {
        match db.add_route(parent, child, position, duration) {
            Ok(_) => summary.routes += 1,
            Err(crate::HubError::ConstraintViolation(reason)) => {
                warn!(parent, child, %reason, "skipping demo route");
                summary
                    .rejected
                    .push(format!("{parent} -> {child}: {reason}"));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}
