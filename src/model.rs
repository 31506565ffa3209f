//! Core data types for airports, routes and closure rows.

use std::fmt;

use serde::Serialize;

use crate::types::{HubError, Result};

/// Row identifier for an airport.
pub type AirportId = i64;

/// Row identifier for a route.
pub type RouteId = i64;

/// A uniquely-coded node in the route tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Airport {
    /// Storage identifier.
    pub id: AirportId,
    /// Unique, case-normalized airport code (e.g. `JFK`).
    pub code: String,
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Which of the two child slots of a parent a route occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Position {
    /// The left child slot, encoded as `L` in closure paths.
    Left,
    /// The right child slot, encoded as `R` in closure paths.
    Right,
}

impl Position {
    /// Single-letter path encoding for this position.
    pub fn letter(self) -> char {
        match self {
            Position::Left => 'L',
            Position::Right => 'R',
        }
    }

    /// Inverse of [`Position::letter`].
    pub fn from_letter(letter: &str) -> Result<Self> {
        match letter {
            "L" => Ok(Position::Left),
            "R" => Ok(Position::Right),
            other => Err(HubError::ConstraintViolation(format!(
                "invalid position letter: {other:?}"
            ))),
        }
    }

    /// Parses a user-facing position name (`left`/`right`, any case, or the
    /// single letter form).
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "LEFT" | "L" => Ok(Position::Left),
            "RIGHT" | "R" => Ok(Position::Right),
            other => Err(HubError::ConstraintViolation(format!(
                "invalid position: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Left => f.write_str("LEFT"),
            Position::Right => f.write_str("RIGHT"),
        }
    }
}

/// A direct, positioned, weighted route between two airports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Storage identifier.
    pub id: RouteId,
    /// Source airport.
    pub parent: Airport,
    /// Destination airport.
    pub child: Airport,
    /// Child slot this route occupies on the parent.
    pub position: Position,
    /// Flight duration in minutes. Always positive.
    pub duration_minutes: u32,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}, {} min)",
            self.parent.code, self.child.code, self.position, self.duration_minutes
        )
    }
}

/// A materialized ancestor/descendant reachability fact.
///
/// Invariants: `path` is a string over `{L, R}`, `path.len() == depth as
/// usize`, and self-rows are `(e, e, 0, "")`. At most one row exists per
/// `(ancestor, descendant)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureRow {
    /// Ancestor airport id.
    pub ancestor: AirportId,
    /// Descendant airport id.
    pub descendant: AirportId,
    /// Number of routes between ancestor and descendant.
    pub depth: u32,
    /// Exact sequence of positions traversed, e.g. `"LR"`.
    pub path: String,
}
