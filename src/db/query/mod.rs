//! Read-only query algorithms over the route store and closure index.
//!
//! Queries never traverse the tree node-by-node: the Nth-node lookup is a
//! single indexed point read against the closure index, and the duration
//! queries are single scans of the route table.

mod analytics;
mod hierarchy;

pub use analytics::Stats;
