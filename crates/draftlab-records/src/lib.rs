//! The canonical match record: one per completed game (spec.md §3).
//!
//! This crate owns only the record shape and its draft invariants. It does
//! no I/O beyond simple JSON (de)serialization and performs no feature
//! computation — that is `draftlab-features`'s job, kept pure (spec.md §9).
mod draft;
mod record;

pub use draft::*;
pub use record::*;
