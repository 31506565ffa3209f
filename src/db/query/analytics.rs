//! Duration queries and dashboard statistics over the route store.

use rusqlite::params;
use serde::Serialize;

use crate::db::routes::route_from_row;
use crate::db::Db;
use crate::model::Route;
use crate::types::Result;

/// Basic statistics for dashboards and the `stats` CLI command.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    /// Total number of airports.
    pub airports: u64,
    /// Total number of routes.
    pub routes: u64,
    /// Longest route in the system, if any routes exist.
    pub longest_route: Option<Route>,
}

const ROUTE_SELECT: &str = "r.id, p.id, p.code, c.id, c.code, r.position, r.duration
     FROM routes r
     JOIN airports p ON p.id = r.parent_id
     JOIN airports c ON c.id = r.child_id";

impl Db {
    /// The route with the greatest duration across the whole system.
    ///
    /// Ties break deterministically: lowest parent code first, then lowest
    /// child code.
    pub fn longest_route(&self) -> Result<Option<Route>> {
        let sql = format!(
            "SELECT {ROUTE_SELECT}
             ORDER BY r.duration DESC, p.code ASC, c.code ASC
             LIMIT 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(route_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// The longest route leaving a specific airport, with the same tie-break
    /// as [`Db::longest_route`].
    pub fn longest_route_from(&self, parent_code: &str) -> Result<Option<Route>> {
        let parent = self.airport(parent_code)?;
        let sql = format!(
            "SELECT {ROUTE_SELECT}
             WHERE r.parent_id = ?1
             ORDER BY r.duration DESC, c.code ASC
             LIMIT 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![parent.id])?;
        match rows.next()? {
            Some(row) => Ok(Some(route_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// The direct route with the least duration from `source_code` to
    /// `destination_code`.
    ///
    /// Only direct routes are considered, not multi-hop paths. Under the
    /// per-parent position uniqueness invariant at most one such route can
    /// exist, so this returns zero or one row.
    pub fn shortest_route_between(
        &self,
        source_code: &str,
        destination_code: &str,
    ) -> Result<Option<Route>> {
        let source = self.airport(source_code)?;
        let destination = self.airport(destination_code)?;
        let sql = format!(
            "SELECT {ROUTE_SELECT}
             WHERE r.parent_id = ?1 AND r.child_id = ?2
             ORDER BY r.duration ASC
             LIMIT 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![source.id, destination.id])?;
        match rows.next()? {
            Some(row) => Ok(Some(route_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Counts plus the longest route, in one snapshot.
    pub fn stats(&self) -> Result<Stats> {
        Ok(Stats {
            airports: self.count_airports()?,
            routes: self.count_routes()?,
            longest_route: self.longest_route()?,
        })
    }
}
