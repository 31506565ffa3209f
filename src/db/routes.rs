//! Route store and the closure maintenance write path.

use rusqlite::{params, Transaction};
use tracing::{debug, info};

use crate::db::airports::{lookup_airport, normalize_code};
use crate::db::{is_constraint, Db};
use crate::model::{Airport, ClosureRow, Position, Route};
use crate::types::{HubError, Result};

impl Db {
    /// Inserts a route and extends the closure index, as one atomic unit.
    ///
    /// The closure index stores one row per ancestor/descendant pair with the
    /// exact `L`/`R` path between them. Inserting `parent -> child` therefore
    /// has to add, for every ancestor of `parent` (`parent` itself included
    /// via its self-row) and every descendant of `child` (`child` itself
    /// included), a row joining the two sides through the new step. When the
    /// child is a leaf this collapses to one new row per ancestor of the
    /// parent; when the child is the root of an existing subtree it is the
    /// cross product that makes the whole subtree reachable from above. All
    /// derived rows are collected first and written as a single batch inside
    /// the same transaction as the route itself; a failure anywhere rolls the
    /// whole unit back, leaving neither the route nor any closure row
    /// visible.
    ///
    /// Structural guards, each failing with
    /// [`HubError::ConstraintViolation`]:
    /// - `parent` and `child` must be distinct,
    /// - `parent` may hold at most one route per position,
    /// - `child` must not already have a parent route,
    /// - `child` must not be an ancestor of `parent`.
    ///
    /// The last two keep the structure a forest of strict binary trees; the
    /// ancestor check is a single closure lookup, not a traversal.
    ///
    /// Runs in O(ancestors of `parent` x descendants of `child`), which is
    /// O(depth of `parent`) for the common case of attaching a fresh leaf.
    pub fn add_route(
        &mut self,
        parent_code: &str,
        child_code: &str,
        position: Position,
        duration_minutes: u32,
    ) -> Result<Route> {
        if duration_minutes == 0 {
            return Err(HubError::ConstraintViolation(
                "route duration must be positive".into(),
            ));
        }
        let parent_code = normalize_code(parent_code)?;
        let child_code = normalize_code(child_code)?;

        let tx = self.conn.transaction()?;
        let route = insert_route_tx(&tx, &parent_code, &child_code, position, duration_minutes)?;
        tx.commit()?;

        info!(
            parent = %route.parent.code,
            child = %route.child.code,
            position = %route.position,
            duration = route.duration_minutes,
            "added route"
        );
        Ok(route)
    }

    /// The direct route occupying `position` on `parent`, if any.
    pub fn route_at(&self, parent_code: &str, position: Position) -> Result<Option<Route>> {
        let parent = self.airport(parent_code)?;
        let mut stmt = self.conn.prepare(
            "SELECT r.id, p.id, p.code, c.id, c.code, r.position, r.duration
             FROM routes r
             JOIN airports p ON p.id = r.parent_id
             JOIN airports c ON c.id = r.child_id
             WHERE r.parent_id = ?1 AND r.position = ?2",
        )?;
        let mut rows = stmt.query(params![parent.id, position.letter().to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(route_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// All direct routes leaving `parent_code`, left slot first.
    pub fn routes_from(&self, parent_code: &str) -> Result<Vec<Route>> {
        let parent = self.airport(parent_code)?;
        let mut stmt = self.conn.prepare(
            "SELECT r.id, p.id, p.code, c.id, c.code, r.position, r.duration
             FROM routes r
             JOIN airports p ON p.id = r.parent_id
             JOIN airports c ON c.id = r.child_id
             WHERE r.parent_id = ?1
             ORDER BY r.position",
        )?;
        let mut rows = stmt.query(params![parent.id])?;
        let mut routes = Vec::new();
        while let Some(row) = rows.next()? {
            routes.push(route_from_row(row)?);
        }
        Ok(routes)
    }

    /// Number of routes.
    pub fn count_routes(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM routes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Maps a joined route row in the column order
/// `(route id, parent id, parent code, child id, child code, position, duration)`.
pub(crate) fn route_from_row(row: &rusqlite::Row<'_>) -> Result<Route> {
    let letter: String = row.get(5)?;
    Ok(Route {
        id: row.get(0)?,
        parent: Airport {
            id: row.get(1)?,
            code: row.get(2)?,
        },
        child: Airport {
            id: row.get(3)?,
            code: row.get(4)?,
        },
        position: Position::from_letter(&letter)?,
        duration_minutes: row.get(6)?,
    })
}

fn insert_route_tx(
    tx: &Transaction<'_>,
    parent_code: &str,
    child_code: &str,
    position: Position,
    duration_minutes: u32,
) -> Result<Route> {
    let parent = lookup_airport(tx, parent_code)?;
    let child = lookup_airport(tx, child_code)?;

    if parent.id == child.id {
        return Err(HubError::ConstraintViolation(format!(
            "route endpoints must differ: {}",
            parent.code
        )));
    }

    let has_parent: bool = tx.query_row(
        "SELECT EXISTS (SELECT 1 FROM routes WHERE child_id = ?1)",
        params![child.id],
        |row| row.get(0),
    )?;
    if has_parent {
        return Err(HubError::ConstraintViolation(format!(
            "{} already has an incoming route",
            child.code
        )));
    }

    let creates_cycle: bool = tx.query_row(
        "SELECT EXISTS (
            SELECT 1 FROM closure WHERE ancestor_id = ?1 AND descendant_id = ?2
         )",
        params![child.id, parent.id],
        |row| row.get(0),
    )?;
    if creates_cycle {
        return Err(HubError::ConstraintViolation(format!(
            "{} is an ancestor of {}, route would create a cycle",
            child.code, parent.code
        )));
    }

    let inserted = tx.execute(
        "INSERT INTO routes (parent_id, child_id, position, duration)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            parent.id,
            child.id,
            position.letter().to_string(),
            duration_minutes
        ],
    );
    match inserted {
        Ok(_) => {}
        Err(err) if is_constraint(&err) => {
            return Err(HubError::ConstraintViolation(format!(
                "{} already has a {} route",
                parent.code, position
            )));
        }
        Err(err) => return Err(err.into()),
    }
    let route_id = tx.last_insert_rowid();

    // Self-rows for both endpoints. The parent's is what puts the parent
    // itself among the ancestors joined below; either row may already exist
    // from a prior insertion.
    tx.execute(
        "INSERT OR IGNORE INTO closure (ancestor_id, descendant_id, depth, path)
         VALUES (?1, ?1, 0, '')",
        params![parent.id],
    )?;
    tx.execute(
        "INSERT OR IGNORE INTO closure (ancestor_id, descendant_id, depth, path)
         VALUES (?1, ?1, 0, '')",
        params![child.id],
    )?;

    // Every ancestor of the parent now reaches every descendant of the child
    // through the new step: (a -> parent) + step + (child -> x). Both sides
    // include their self-rows, so the direct parent -> child row falls out of
    // the same product. Collect the batch first so the write stays a single
    // unit.
    let letter = position.letter();
    let above = closure_rows_reaching(tx, parent.id)?;
    let below = closure_rows_leaving(tx, child.id)?;
    let mut batch = Vec::with_capacity(above.len() * below.len());
    for (ancestor, upper_depth, upper_path) in &above {
        for (descendant, lower_depth, lower_path) in &below {
            let mut path = String::with_capacity(upper_path.len() + 1 + lower_path.len());
            path.push_str(upper_path);
            path.push(letter);
            path.push_str(lower_path);
            batch.push(ClosureRow {
                ancestor: *ancestor,
                descendant: *descendant,
                depth: upper_depth + 1 + lower_depth,
                path,
            });
        }
    }

    let mut insert = tx.prepare(
        "INSERT INTO closure (ancestor_id, descendant_id, depth, path)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for row in &batch {
        if let Err(err) = insert.execute(params![row.ancestor, row.descendant, row.depth, row.path])
        {
            if is_constraint(&err) {
                return Err(HubError::ConstraintViolation(format!(
                    "closure row already exists for ancestor {} and descendant {}",
                    row.ancestor, row.descendant
                )));
            }
            return Err(err.into());
        }
    }

    debug!(
        parent = %parent.code,
        child = %child.code,
        closure_rows = batch.len(),
        "extended closure index"
    );

    Ok(Route {
        id: route_id,
        parent,
        child,
        position,
        duration_minutes,
    })
}

/// Ancestor rows of `node`, self-row included: `(ancestor, depth, path)`.
fn closure_rows_reaching(
    tx: &Transaction<'_>,
    node: i64,
) -> Result<Vec<(i64, u32, String)>> {
    closure_half(tx, "ancestor_id", "descendant_id", node)
}

/// Descendant rows of `node`, self-row included: `(descendant, depth, path)`.
fn closure_rows_leaving(
    tx: &Transaction<'_>,
    node: i64,
) -> Result<Vec<(i64, u32, String)>> {
    closure_half(tx, "descendant_id", "ancestor_id", node)
}

fn closure_half(
    tx: &Transaction<'_>,
    select_col: &str,
    match_col: &str,
    node: i64,
) -> Result<Vec<(i64, u32, String)>> {
    let sql = format!("SELECT {select_col}, depth, path FROM closure WHERE {match_col} = ?1");
    let mut stmt = tx.prepare(&sql)?;
    let mut rows = stmt.query(params![node])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push((row.get(0)?, row.get(1)?, row.get(2)?));
    }
    Ok(out)
}
