use crate::classifier::FittedClassifier;
use crate::classifier::ModelType;
use crate::Calibrator;
use draftlab_core::Patch;
use draftlab_core::TierGroup;
use draftlab_eval::GateVerdict;
use draftlab_eval::Metrics;
use draftlab_features::FeatureMode;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

/// Fixed fields of a model card (spec.md §3 "Model artifact"). `metrics`
/// carries both raw and calibrated test-set scores; `gate_verdict` is
/// filled in once the evaluator has run (spec.md §4.6) and stays `None`
/// for an artifact that has not yet been compared against an incumbent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCard {
    pub trained_at_unix: u64,
    pub tier_group: TierGroup,
    pub model_type: ModelType,
    pub n_train: usize,
    pub n_val: usize,
    pub n_test: usize,
    pub feature_dim: usize,
    pub source_patch: Patch,
    pub metrics_raw: Metrics,
    pub metrics_calibrated: Metrics,
    pub gate_verdict: Option<GateVerdict>,
}

impl std::fmt::Display for ModelCard {
    /// One-line human-readable summary, used by the trainer CLI and the
    /// gate's stderr diagnostics.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} @ {} | n=({}/{}/{}) auc={:.3} ll={:.3} ece={:.3} gate={}",
            self.tier_group,
            self.model_type,
            self.source_patch,
            self.n_train,
            self.n_val,
            self.n_test,
            self.metrics_calibrated.roc_auc,
            self.metrics_calibrated.log_loss,
            self.metrics_calibrated.ece,
            self.gate_verdict.map(|v| v.accepted).unwrap_or(false),
        )
    }
}

/// The classifier + calibrator pair a single artifact carries (spec.md
/// §3 "Model artifact"). Kept distinct from [`ModelCard`] so the registry
/// can report cards for every artifact on disk without deserializing the
/// (much larger) classifier weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub classifier: FittedClassifier,
    pub calibrator: Calibrator,
    pub feature_mode: FeatureMode,
    pub feature_version: String,
}

/// One immutable, timestamped training output (spec.md §4.5 step 7,
/// §6.4): `{classifier, calibrator, model_card}`. Artifacts round-trip
/// through a single save/load pair (spec.md §8 "Round-trip for the
/// artifact bundle").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedArtifact {
    pub bundle: ClassifierArtifact,
    pub card: ModelCard,
}

impl TrainedArtifact {
    /// Filename convention `<tier_group>-<trained_at_unix>.json` (spec.md
    /// §6.4), immutable once written.
    pub fn filename(&self) -> String {
        format!("{}-{}.json", self.card.tier_group, self.card.trained_at_unix)
    }

    pub fn save(&self, directory: impl AsRef<Path>) -> anyhow::Result<std::path::PathBuf> {
        std::fs::create_dir_all(directory.as_ref())?;
        let path = directory.as_ref().join(self.filename());
        std::fs::write(&path, serde_json::to_vec_pretty(self)?)?;
        Ok(path)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
