use draftlab_core::DraftMlError;
use draftlab_core::Patch;
use draftlab_core::Tier;
use draftlab_infer::InferenceEngine;
use draftlab_infer::PredictionResult;
use draftlab_records::Draft;
use serde::Deserialize;
use serde::Serialize;

/// `predict(record, tier_group, patch)` request document (spec.md §4.8).
/// `patch` is transmitted as `"season.minor"` and parsed on arrival rather
/// than trusted as pre-validated input from the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub draft: Draft,
    pub tier: Tier,
    pub patch: String,
}

impl PredictRequest {
    /// Parses `patch` and invokes the inference engine, turning a
    /// malformed patch string into the same `InvalidRequest` kind as any
    /// other schema violation (spec.md §7).
    pub fn predict(&self, engine: &InferenceEngine) -> Result<PredictResponse, DraftMlError> {
        let patch = Patch::parse(&self.patch)?;
        let result = engine.predict(&self.draft, self.tier, patch, None)?;
        Ok(PredictResponse::from(result))
    }
}

/// `predict` response document; field names fixed by spec.md §4.8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub blue_win_prob_raw: f32,
    pub blue_win_prob_calibrated: f32,
    pub confidence: f32,
    pub top_positive: Vec<draftlab_infer::Contribution>,
    pub top_negative: Vec<draftlab_infer::Contribution>,
    pub model_version: String,
    pub feature_version: String,
    pub tier_group: String,
    pub patch: String,
}

impl From<PredictionResult> for PredictResponse {
    fn from(r: PredictionResult) -> Self {
        Self {
            blue_win_prob_raw: r.blue_win_prob_raw,
            blue_win_prob_calibrated: r.blue_win_prob_calibrated,
            confidence: r.confidence,
            top_positive: r.top_positive,
            top_negative: r.top_negative,
            model_version: r.model_version,
            feature_version: r.feature_version,
            tier_group: r.tier_group.to_string(),
            patch: r.patch.to_string(),
        }
    }
}
