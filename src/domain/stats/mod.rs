//! Descriptive per-version statistics
//!
//! Aggregates are recomputed from the full record set on every query rather
//! than maintained incrementally, so concurrent writers can never leave a
//! partially updated summary behind.

mod aggregate;

pub use aggregate::{aggregate, AggregateStats, LatencyStats, VersionStats};
