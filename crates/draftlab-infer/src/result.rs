use draftlab_core::Patch;
use draftlab_core::TierGroup;
use serde::Deserialize;
use serde::Serialize;

/// One labeled feature's signed contribution to the raw score (spec.md
/// §4.8 "explanations"). Sign and magnitude are classifier-kind-specific:
/// tree ensembles report a feature-importance-like value, linear models
/// report `coefficient * feature_value`, MLPs report a gradient × input
/// approximation from a single backward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: String,
    pub value: f32,
}

/// The full result of one `predict` call (spec.md §4.8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub blue_win_prob_raw: f32,
    pub blue_win_prob_calibrated: f32,
    /// `|p - 0.5| * 200`, as a percent (spec.md §4.8).
    pub confidence: f32,
    pub top_positive: Vec<Contribution>,
    pub top_negative: Vec<Contribution>,
    pub model_version: String,
    pub feature_version: String,
    pub tier_group: TierGroup,
    pub patch: Patch,
}

impl PredictionResult {
    pub fn confidence_from(calibrated: f32) -> f32 {
        (calibrated - 0.5).abs() * 200.0
    }
}
