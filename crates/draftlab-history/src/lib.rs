//! Per-tier-group aggregates of individual, pair, and matchup win rates
//! over stored matches (spec.md §4.2).
//!
//! Builders are exclusive-writer; readers see either the old or the new
//! complete snapshot via an atomic pointer swap owned by the caller
//! (`draftlab-refresh`) — this crate itself only builds immutable
//! [`HistoryIndex`] values and answers queries against them.
mod aggregate;
mod build;
mod query;
mod store;

pub use aggregate::*;
pub use build::*;
pub use query::*;
pub use store::*;
