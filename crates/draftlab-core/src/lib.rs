//! Core type aliases, traits, and constants for draftlab.
//!
//! This crate provides the foundational types and configuration parameters
//! used throughout the draftlab workspace: stable identifiers, the
//! tier/tier-group/patch/role vocabulary, typed errors, and the runtime
//! knobs (thresholds, gate tolerances) that every other crate takes as an
//! explicit parameter rather than reading from a global.
#![allow(dead_code)]

mod config;
mod error;
mod id;
mod patch;
mod role;
mod runtime;
mod tier;

pub use config::*;
pub use error::*;
pub use id::*;
pub use patch::*;
pub use role::*;
pub use runtime::*;
pub use tier::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Champion ids, dataset sizes, and contiguous index positions.
pub type ChampionId = i64;
/// Win probabilities, pick/ban rates, and other bounded scores.
pub type Probability = f32;
/// Ordinal tag scores (engage, cc, poke, ...), always in 0..3.
pub type Ordinal = u8;

/// Random instance generation for testing and property-style checks.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}
