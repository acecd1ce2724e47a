//! Per-patch champion popularity/win-rate aggregates (spec.md §4.10).
//!
//! Served from an in-memory snapshot that `draftlab-refresh` rebuilds;
//! this crate only builds and queries immutable [`MetaSnapshot`] values.
mod snapshot;

pub use snapshot::*;
