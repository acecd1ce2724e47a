//! Recommendation engine (spec.md §4.9): ranks pick/ban candidates by
//! re-invoking the inference engine on a tentatively-completed draft per
//! candidate and scoring the resulting delta against a tier skill bias.
mod candidate;
mod engine;
mod reason;

pub use candidate::RecommendationResult;
pub use candidate::RecommendedCandidate;
pub use engine::RecommendationEngine;
pub use reason::generate_reasons;
