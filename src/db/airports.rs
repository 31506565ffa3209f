//! Entity store operations.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::db::{is_constraint, Db};
use crate::model::Airport;
use crate::types::{HubError, Result};

impl Db {
    /// Creates an airport with the given code.
    ///
    /// The code is trimmed and uppercased before insertion. Fails with
    /// [`HubError::DuplicateCode`] if the normalized code already exists and
    /// [`HubError::ConstraintViolation`] if it is empty.
    pub fn create_airport(&mut self, code: &str) -> Result<Airport> {
        let code = normalize_code(code)?;
        match self
            .conn
            .execute("INSERT INTO airports (code) VALUES (?1)", params![code])
        {
            Ok(_) => {
                let airport = Airport {
                    id: self.conn.last_insert_rowid(),
                    code,
                };
                debug!(code = %airport.code, id = airport.id, "created airport");
                Ok(airport)
            }
            Err(err) if is_constraint(&err) => Err(HubError::DuplicateCode(code)),
            Err(err) => Err(err.into()),
        }
    }

    /// Looks up an airport by code, failing with [`HubError::NotFound`] if it
    /// does not exist.
    pub fn airport(&self, code: &str) -> Result<Airport> {
        let code = normalize_code(code)?;
        lookup_airport(&self.conn, &code)
    }

    /// All airports ordered by code.
    pub fn airports(&self) -> Result<Vec<Airport>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, code FROM airports ORDER BY code")?;
        let rows = stmt.query_map([], |row| {
            Ok(Airport {
                id: row.get(0)?,
                code: row.get(1)?,
            })
        })?;
        let mut airports = Vec::new();
        for airport in rows {
            airports.push(airport?);
        }
        Ok(airports)
    }

    /// Number of airports.
    pub fn count_airports(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM airports", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Shared lookup used by both the public accessor and the write path, which
/// must resolve codes against the same transaction it writes under.
pub(crate) fn lookup_airport(conn: &Connection, code: &str) -> Result<Airport> {
    let found = conn
        .query_row(
            "SELECT id, code FROM airports WHERE code = ?1",
            params![code],
            |row| {
                Ok(Airport {
                    id: row.get(0)?,
                    code: row.get(1)?,
                })
            },
        )
        .optional()?;
    found.ok_or_else(|| HubError::NotFound(code.to_string()))
}

pub(crate) fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(HubError::ConstraintViolation(
            "airport code must not be empty".into(),
        ));
    }
    Ok(code)
}
