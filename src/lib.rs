//! Hubtree is an embedded database for forests of strict binary trees of
//! airports connected by weighted routes.
//!
//! Every route insertion incrementally extends a materialized closure index
//! that records, for each ancestor/descendant pair, the depth and the exact
//! sequence of `L`/`R` steps between them. Structural queries ("what is the
//! Nth node always turning left from here?") are then single indexed lookups
//! instead of tree walks.

#![warn(missing_docs)]

pub mod cli;
pub mod db;
pub mod model;
pub mod types;

pub use db::Db;
pub use model::{Airport, ClosureRow, Position, Route};
pub use types::{HubError, Result};
