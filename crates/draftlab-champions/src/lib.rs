//! Champion attribute map and the champion id <-> index bijection.
//!
//! Loaded once at process start and cached by the caller (spec.md §4.1).
//! Regeneration from a static overrides file plus an external champion
//! metadata service is out of scope for the core; this crate treats the
//! map as a read-only input.
//!
//! ## Core Types
//!
//! - [`ChampionAttributes`] — role, damage type, and ordinal tag scores
//! - [`ChampIndex`] — stable bijection between champion id and `0..N`
//! - [`AttributeMap`] — the loaded, queryable map
mod attributes;
mod index;
mod map;

pub use attributes::*;
pub use index::*;
pub use map::*;
