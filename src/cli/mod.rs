//! Support code for the `hubtree` CLI binary: CSV import and the demo
//! dataset seeder.

pub mod import;
pub mod seed;

pub use import::{run_import, CliError, ImportConfig, ImportSummary};
pub use seed::{run_seed, SeedSummary};
