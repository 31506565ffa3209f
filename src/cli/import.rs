//! CSV import for airports and routes.
//!
//! Airports are imported before routes so a single invocation can load a
//! whole dataset. Row-level failures (duplicate codes, occupied slots,
//! malformed fields) are logged and skipped rather than aborting the import;
//! each route still commits atomically on its own.

use std::path::PathBuf;

use csv::StringRecord;
use thiserror::Error;
use tracing::warn;

use crate::db::Db;
use crate::model::Position;
use crate::types::HubError;

/// Error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generic error message.
    #[error("{0}")]
    Message(String),
    /// IO error from file operations.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// CSV parsing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Database error.
    #[error(transparent)]
    Db(#[from] HubError),
}

impl From<String> for CliError {
    fn from(value: String) -> Self {
        CliError::Message(value)
    }
}

/// Configuration for a CSV import run.
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    /// CSV file with a `code` column, one airport per row.
    pub airports: Option<PathBuf>,
    /// CSV file with `parent`, `child`, `position` and `duration` columns,
    /// one route per row.
    pub routes: Option<PathBuf>,
}

/// Summary statistics from an import run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ImportSummary {
    /// Airports successfully created.
    pub airports_imported: u64,
    /// Routes successfully inserted.
    pub routes_imported: u64,
    /// Rows skipped because of per-row failures.
    pub rows_skipped: u64,
}

/// Imports airports and/or routes from CSV files into `db`.
pub fn run_import(db: &mut Db, config: &ImportConfig) -> Result<ImportSummary, CliError> {
    let mut summary = ImportSummary::default();

    if let Some(path) = &config.airports {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let code_idx = column_index(&headers, "code")?;
        for record in reader.records() {
            let record = record?;
            let code = field(&record, code_idx, "code")?;
            match db.create_airport(code) {
                Ok(_) => summary.airports_imported += 1,
                Err(err) => {
                    warn!(code, %err, "skipping airport row");
                    summary.rows_skipped += 1;
                }
            }
        }
    }

    if let Some(path) = &config.routes {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let parent_idx = column_index(&headers, "parent")?;
        let child_idx = column_index(&headers, "child")?;
        let position_idx = column_index(&headers, "position")?;
        let duration_idx = column_index(&headers, "duration")?;
        for record in reader.records() {
            let record = record?;
            match import_route(db, &record, parent_idx, child_idx, position_idx, duration_idx) {
                Ok(()) => summary.routes_imported += 1,
                Err(err) => {
                    warn!(%err, "skipping route row");
                    summary.rows_skipped += 1;
                }
            }
        }
    }

    Ok(summary)
}

fn import_route(
    db: &mut Db,
    record: &StringRecord,
    parent_idx: usize,
    child_idx: usize,
    position_idx: usize,
    duration_idx: usize,
) -> Result<(), CliError> {
    let parent = field(record, parent_idx, "parent")?;
    let child = field(record, child_idx, "child")?;
    let position = Position::parse(field(record, position_idx, "position")?)?;
    let duration: u32 = field(record, duration_idx, "duration")?
        .trim()
        .parse()
        .map_err(|_| CliError::Message(format!("invalid duration in row {record:?}")))?;
    db.add_route(parent, child, position, duration)?;
    Ok(())
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, CliError> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
        .ok_or_else(|| CliError::Message(format!("missing CSV column: {name}")))
}

fn field<'r>(record: &'r StringRecord, idx: usize, name: &str) -> Result<&'r str, CliError> {
    record
        .get(idx)
        .ok_or_else(|| CliError::Message(format!("missing {name} field in row {record:?}")))
}
