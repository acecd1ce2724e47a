mod linear;
mod mlp;
mod tree;

pub use linear::LogisticClassifier;
pub use mlp::MlpClassifier;
pub use tree::TreeEnsembleClassifier;

use serde::Deserialize;
use serde::Serialize;

/// The three classifier families named in spec.md §4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    TreeEnsemble,
    Linear,
    Mlp,
}

impl ModelType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ModelType::TreeEnsemble => "tree_ensemble",
            ModelType::Linear => "linear",
            ModelType::Mlp => "mlp",
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelType {
    type Err = draftlab_core::DraftMlError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree_ensemble" => Ok(ModelType::TreeEnsemble),
            "linear" => Ok(ModelType::Linear),
            "mlp" => Ok(ModelType::Mlp),
            other => Err(draftlab_core::DraftMlError::invalid_request(format!(
                "unknown model type '{other}'"
            ))),
        }
    }
}

/// A trained classifier of one of the three families, dispatched by
/// variant rather than by trait object so the artifact can carry its own
/// concrete, serializable state (spec.md §4.5, §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FittedClassifier {
    TreeEnsemble(TreeEnsembleClassifier),
    Linear(LogisticClassifier),
    Mlp(MlpClassifier),
}

impl FittedClassifier {
    pub fn kind(&self) -> ModelType {
        match self {
            FittedClassifier::TreeEnsemble(_) => ModelType::TreeEnsemble,
            FittedClassifier::Linear(_) => ModelType::Linear,
            FittedClassifier::Mlp(_) => ModelType::Mlp,
        }
    }

    pub fn predict_raw(&self, x: &[f32]) -> f32 {
        match self {
            FittedClassifier::TreeEnsemble(m) => m.predict_raw(x),
            FittedClassifier::Linear(m) => m.predict_raw(x),
            FittedClassifier::Mlp(m) => m.predict_raw(x),
        }
    }

    pub fn contributions(&self, x: &[f32]) -> Vec<f32> {
        match self {
            FittedClassifier::TreeEnsemble(m) => m.contributions(x),
            FittedClassifier::Linear(m) => m.contributions(x),
            FittedClassifier::Mlp(m) => m.contributions(x),
        }
    }
}

/// Fits `model_type` on `(x_train, y_train)`, using `(x_val, y_val)` for
/// the early-stopping criterion that tree ensembles and MLPs use
/// (spec.md §4.5 step 4). Linear models ignore the validation split.
pub fn fit(
    model_type: ModelType,
    n_features: usize,
    x_train: &[Vec<f32>],
    y_train: &[bool],
    x_val: &[Vec<f32>],
    y_val: &[bool],
    seed: u64,
) -> FittedClassifier {
    match model_type {
        ModelType::Linear => {
            let mut m = LogisticClassifier::new(n_features);
            m.fit(x_train, y_train);
            FittedClassifier::Linear(m)
        }
        ModelType::TreeEnsemble => {
            let mut m = TreeEnsembleClassifier::new();
            m.fit_validated(x_train, y_train, x_val, y_val);
            FittedClassifier::TreeEnsemble(m)
        }
        ModelType::Mlp => {
            let mut m = MlpClassifier::with_default_architecture(n_features, seed);
            m.fit_validated(x_train, y_train, x_val, y_val);
            FittedClassifier::Mlp(m)
        }
    }
}
