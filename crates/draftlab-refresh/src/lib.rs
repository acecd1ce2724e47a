//! Context refresher (spec.md §4.11): on demand, atomically rebuilds the
//! history index, meta aggregates, and per-`(tier_group, patch)` assets,
//! then swaps the snapshots an [`draftlab_infer::InferenceEngine`] reads
//! from. Readers never observe a partially built snapshot — every
//! structure is built into a shadow value before any pointer moves.
mod refresher;
mod report;

pub use refresher::ContextRefresher;
pub use refresher::RefreshTarget;
pub use report::RefreshReport;
