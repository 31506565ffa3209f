//! Read access to the closure index.

use rusqlite::{params, OptionalExtension};

use crate::db::Db;
use crate::model::{Airport, ClosureRow};
use crate::types::Result;

impl Db {
    /// The closure row linking two airports, if one is reachable from the
    /// other by a directed path.
    pub fn closure_row(
        &self,
        ancestor_code: &str,
        descendant_code: &str,
    ) -> Result<Option<ClosureRow>> {
        let ancestor = self.airport(ancestor_code)?;
        let descendant = self.airport(descendant_code)?;
        let row = self
            .conn
            .query_row(
                "SELECT ancestor_id, descendant_id, depth, path
                 FROM closure
                 WHERE ancestor_id = ?1 AND descendant_id = ?2",
                params![ancestor.id, descendant.id],
                closure_from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Ancestors of an airport ordered nearest-first, excluding the airport
    /// itself. Each entry carries the depth and path from the ancestor down.
    pub fn ancestors_of(&self, code: &str) -> Result<Vec<(Airport, ClosureRow)>> {
        self.closure_neighbors(
            code,
            "SELECT a.id, a.code, c.ancestor_id, c.descendant_id, c.depth, c.path
             FROM closure c
             JOIN airports a ON a.id = c.ancestor_id
             WHERE c.descendant_id = ?1 AND c.depth > 0
             ORDER BY c.depth",
        )
    }

    /// Descendants of an airport ordered nearest-first, excluding the airport
    /// itself.
    pub fn descendants_of(&self, code: &str) -> Result<Vec<(Airport, ClosureRow)>> {
        self.closure_neighbors(
            code,
            "SELECT a.id, a.code, c.ancestor_id, c.descendant_id, c.depth, c.path
             FROM closure c
             JOIN airports a ON a.id = c.descendant_id
             WHERE c.ancestor_id = ?1 AND c.depth > 0
             ORDER BY c.depth, c.path",
        )
    }

    /// Every closure row, ordered by ancestor then descendant. Intended for
    /// verification and tests.
    pub fn closure_rows(&self) -> Result<Vec<ClosureRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT ancestor_id, descendant_id, depth, path
             FROM closure
             ORDER BY ancestor_id, descendant_id",
        )?;
        let rows = stmt.query_map([], closure_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn closure_neighbors(&self, code: &str, sql: &str) -> Result<Vec<(Airport, ClosureRow)>> {
        let airport = self.airport(code)?;
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![airport.id])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let neighbor = Airport {
                id: row.get(0)?,
                code: row.get(1)?,
            };
            let closure = ClosureRow {
                ancestor: row.get(2)?,
                descendant: row.get(3)?,
                depth: row.get(4)?,
                path: row.get(5)?,
            };
            out.push((neighbor, closure));
        }
        Ok(out)
    }
}

fn closure_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClosureRow> {
    Ok(ClosureRow {
        ancestor: row.get(0)?,
        descendant: row.get(1)?,
        depth: row.get(2)?,
        path: row.get(3)?,
    })
}
