//! Storage engine: entity store, route store and the closure index.
//!
//! Everything is backed by a single SQLite database via `rusqlite`. The
//! closure index is a derived, denormalized materialization of all
//! ancestor/descendant reachability implied by the route table; the two are
//! kept consistent by running every route insertion as one transaction (see
//! [`Db::add_route`]).

mod airports;
mod closure;
mod routes;
mod verify;

/// Read-only query engine built on the route store and closure index.
pub mod query;


use std::path::Path;

use rusqlite::Connection;

use crate::types::Result;

pub use verify::VerifyReport;

/// Embedded database handle.
///
/// Writes take `&mut self` and run inside a transaction; reads take `&self`
/// and observe a consistent snapshot. Independent handles may be opened on
/// the same file; SQLite's WAL mode keeps readers from blocking the writer.
pub struct Db {
    pub(crate) conn: Connection,
}

impl Db {
    /// Opens (or creates) a database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::bootstrap(conn)
    }

    /// Opens a transient in-memory database. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS airports (
                id INTEGER PRIMARY KEY,
                code TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS routes (
                id INTEGER PRIMARY KEY,
                parent_id INTEGER NOT NULL REFERENCES airports (id),
                child_id INTEGER NOT NULL REFERENCES airports (id),
                position TEXT NOT NULL CHECK (position IN ('L', 'R')),
                duration INTEGER NOT NULL CHECK (duration > 0),
                UNIQUE (parent_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_routes_child ON routes (child_id);

            CREATE TABLE IF NOT EXISTS closure (
                ancestor_id INTEGER NOT NULL REFERENCES airports (id),
                descendant_id INTEGER NOT NULL REFERENCES airports (id),
                depth INTEGER NOT NULL,
                path TEXT NOT NULL,
                PRIMARY KEY (ancestor_id, descendant_id)
            );

            CREATE INDEX IF NOT EXISTS idx_closure_path ON closure (ancestor_id, path);
            CREATE INDEX IF NOT EXISTS idx_closure_descendant ON closure (descendant_id);",
        )?;
        Ok(Self { conn })
    }
}

/// True when `err` is a SQLite constraint failure (unique, check, foreign
/// key). Used to translate storage-level conflicts into domain errors.
pub(crate) fn is_constraint(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
