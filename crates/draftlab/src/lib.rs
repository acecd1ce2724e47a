//! Draft outcome predictor and recommender.
//!
//! This facade crate re-exports every `draftlab-*` crate for convenient
//! access, and backs the `trainer`, `evaluate`, and `refresh-context` CLI
//! bins that drive the pipeline end to end.
//!
//! ## Crate Organization
//!
//! ### Core Types
//! - [`core`] — Tier/patch/role vocabulary, typed errors, config
//! - [`champions`] — Champion attribute map and the champ-index bijection
//! - [`records`] — Canonical match record and draft invariants
//!
//! ### Precomputation
//! - [`history`] — Champ/pair/matchup win-rate aggregates
//! - [`assets`] — Matchup matrices, embeddings, and priors
//! - [`meta`] — Per-patch popularity/win-rate trend aggregates
//!
//! ### Modeling
//! - [`features`] — Feature vector assembly
//! - [`trainer`] — Classifier fitting and calibration
//! - [`eval`] — Metrics and the promotion gate
//! - [`registry`] — Gate-accepted artifact lookup
//!
//! ### Serving
//! - [`infer`] — Prediction engine
//! - [`recommend`] — Pick/ban recommendation engine
//! - [`refresh`] — Atomic context rebuild-and-swap
//! - [`dto`] — Wire request/response documents
pub use draftlab_assets as assets;
pub use draftlab_champions as champions;
pub use draftlab_core as core;
pub use draftlab_dto as dto;
pub use draftlab_eval as eval;
pub use draftlab_features as features;
pub use draftlab_history as history;
pub use draftlab_infer as infer;
pub use draftlab_meta as meta;
pub use draftlab_recommend as recommend;
pub use draftlab_records as records;
pub use draftlab_refresh as refresh;
pub use draftlab_registry as registry;
pub use draftlab_trainer as trainer;

pub use draftlab_core::*;

/// Formats a CLI bin's top-level failure for stderr (spec.md §6): a
/// `DraftMlError` renders its structured `kind=... message=...
/// correlation=...` diagnostic; anything else (a malformed JSON file, a
/// missing path) falls back to its own `Display`.
pub fn diagnostic(error: &anyhow::Error) -> String {
    match error.downcast_ref::<draftlab_core::DraftMlError>() {
        Some(e) => e.diagnostic(),
        None => error.to_string(),
    }
}
