use draftlab_eval::log_loss;
use serde::Deserialize;
use serde::Serialize;

/// A single depth-1 split: `left_value` if `x[feature] <= threshold`,
/// else `right_value`, added to the running log-odds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Stump {
    feature: usize,
    threshold: f32,
    left_value: f32,
    right_value: f32,
}

impl Stump {
    fn output(&self, x: &[f32]) -> f32 {
        if x[self.feature] <= self.threshold { self.left_value } else { self.right_value }
    }
}

/// Gradient-boosted ensemble of depth-1 stumps (spec.md §4.5 step 4:
/// "tree ensemble uses early stopping on val log-loss"). Each round fits
/// one stump to the current logistic pseudo-residual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleClassifier {
    base_score: f32,
    stumps: Vec<Stump>,
    learning_rate: f32,
    max_rounds: usize,
    min_samples_leaf: usize,
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

impl TreeEnsembleClassifier {
    pub fn new() -> Self {
        Self { base_score: 0.0, stumps: Vec::new(), learning_rate: 0.15, max_rounds: 60, min_samples_leaf: 3 }
    }

    fn margin(&self, x: &[f32]) -> f32 {
        self.base_score + self.stumps.iter().map(|s| s.output(x)).sum::<f32>()
    }

    pub fn predict_raw(&self, x: &[f32]) -> f32 {
        sigmoid(self.margin(x))
    }

    /// Feature-importance-like contributions: each stump's output signed
    /// by which side of its split `x` falls on (spec.md §4.8: "tree
    /// ensembles expose feature importances or SHAP-like values").
    pub fn contributions(&self, x: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0f32; x.len()];
        for stump in &self.stumps {
            out[stump.feature] += stump.output(x);
        }
        out
    }

    pub fn fit(&mut self, x: &[Vec<f32>], y: &[bool]) {
        self.fit_validated(x, y, x, y);
    }

    /// Boosting rounds stop early once validation log-loss fails to
    /// improve for several consecutive rounds.
    pub fn fit_validated(&mut self, x_train: &[Vec<f32>], y_train: &[bool], x_val: &[Vec<f32>], y_val: &[bool]) {
        let base_rate = y_train.iter().filter(|&&y| y).count() as f32 / y_train.len().max(1) as f32;
        let base_rate = base_rate.clamp(1e-3, 1.0 - 1e-3);
        self.base_score = (base_rate / (1.0 - base_rate)).ln();
        self.stumps.clear();

        let mut margins: Vec<f32> = x_train.iter().map(|_| self.base_score).collect();
        let mut best_val_loss = f32::MAX;
        let mut rounds_without_improvement = 0;

        for _ in 0..self.max_rounds {
            let residuals: Vec<f32> =
                margins.iter().zip(y_train).map(|(&m, &y)| (if y { 1.0 } else { 0.0 }) - sigmoid(m)).collect();
            let Some(stump) = self.best_stump(x_train, &residuals) else { break };
            for (m, row) in margins.iter_mut().zip(x_train) {
                *m += self.learning_rate * stump.output(row);
            }
            self.stumps.push(stump);

            let val_probs: Vec<f32> = x_val.iter().map(|row| self.predict_raw(row)).collect();
            let val_loss = log_loss(&val_probs, y_val);
            if val_loss + 1e-5 < best_val_loss {
                best_val_loss = val_loss;
                rounds_without_improvement = 0;
            } else {
                rounds_without_improvement += 1;
                if rounds_without_improvement >= 5 {
                    break;
                }
            }
        }
    }

    fn best_stump(&self, x: &[Vec<f32>], residuals: &[f32]) -> Option<Stump> {
        let n_features = x.first()?.len();
        let mut best: Option<(f32, Stump)> = None;

        for feature in 0..n_features {
            let mut values: Vec<f32> = x.iter().map(|row| row[feature]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap());
            values.dedup();
            for window in values.windows(2) {
                let threshold = (window[0] + window[1]) / 2.0;
                let (mut left_sum, mut left_n, mut right_sum, mut right_n) = (0.0f32, 0usize, 0.0f32, 0usize);
                for (row, &r) in x.iter().zip(residuals) {
                    if row[feature] <= threshold {
                        left_sum += r;
                        left_n += 1;
                    } else {
                        right_sum += r;
                        right_n += 1;
                    }
                }
                if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                    continue;
                }
                let left_value = left_sum / left_n as f32;
                let right_value = right_sum / right_n as f32;
                let sse: f32 = x
                    .iter()
                    .zip(residuals)
                    .map(|(row, &r)| {
                        let pred = if row[feature] <= threshold { left_value } else { right_value };
                        (r - pred).powi(2)
                    })
                    .sum();
                if best.as_ref().map(|(b, _)| sse < *b).unwrap_or(true) {
                    best = Some((sse, Stump { feature, threshold, left_value, right_value }));
                }
            }
        }
        best.map(|(_, stump)| stump)
    }
}

impl Default for TreeEnsembleClassifier {
    fn default() -> Self {
        Self::new()
    }
}
