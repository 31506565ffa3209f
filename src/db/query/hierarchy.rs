//! Nth-node lookups against the closure index.

use rusqlite::{params, OptionalExtension};

use crate::db::Db;
use crate::model::{Airport, Position};
use crate::types::Result;

impl Db {
    /// Finds the Nth node reached by always turning in one direction.
    ///
    /// Because the closure index stores the exact sequence of positions
    /// between every ancestor/descendant pair, "the Nth node always turning
    /// left" is the unique row whose ancestor is `start_code` and whose path
    /// is `"L"` repeated `n` times. No traversal happens at query time.
    ///
    /// # Arguments
    /// * `start_code` - Airport to start from; must exist.
    /// * `position` - Direction to repeat.
    /// * `n` - Number of steps. `0` resolves to the start airport itself via
    ///   its self-row (present once the airport participates in any route).
    ///
    /// # Returns
    /// * `Ok(Some(airport))` when a pure-direction chain of length `n` exists.
    /// * `Ok(None)` when the tree is shallower than `n` in that direction.
    ///
    /// # Errors
    /// * [`crate::HubError::NotFound`] if `start_code` does not exist.
    ///
    /// # Example
    /// ```
    /// # use hubtree::{Db, Position, HubError};
    /// # fn main() -> Result<(), HubError> {
    /// let mut db = Db::open_in_memory()?;
    /// for code in ["JFK", "LAX", "SFO"] {
    ///     db.create_airport(code)?;
    /// }
    /// db.add_route("JFK", "LAX", Position::Left, 300)?;
    /// db.add_route("LAX", "SFO", Position::Left, 90)?;
    ///
    /// let second = db.find_nth_node("JFK", Position::Left, 2)?;
    /// assert_eq!(second.map(|a| a.code), Some("SFO".to_string()));
    /// assert!(db.find_nth_node("JFK", Position::Right, 1)?.is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn find_nth_node(
        &self,
        start_code: &str,
        position: Position,
        n: u32,
    ) -> Result<Option<Airport>> {
        let start = self.airport(start_code)?;
        let path = position.letter().to_string().repeat(n as usize);
        let found = self
            .conn
            .query_row(
                "SELECT a.id, a.code
                 FROM closure c
                 JOIN airports a ON a.id = c.descendant_id
                 WHERE c.ancestor_id = ?1 AND c.path = ?2",
                params![start.id, path],
                |row| {
                    Ok(Airport {
                        id: row.get(0)?,
                        code: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }
}
