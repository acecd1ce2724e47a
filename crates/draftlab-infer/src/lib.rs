//! Inference engine (spec.md §4.8): assembles features for a draft
//! request, loads the registry's current artifact for the request's tier
//! group, and returns a raw/calibrated win probability with explanations.
mod cache;
mod engine;
mod labels;
mod result;

pub use cache::canonical_key;
pub use cache::ResultCache;
pub use engine::InferenceEngine;
pub use labels::label_vector;
pub use result::Contribution;
pub use result::PredictionResult;
