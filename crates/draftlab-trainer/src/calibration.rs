use serde::Deserialize;
use serde::Serialize;

/// A monotone step function fit by pool-adjacent-violators (PAVA) over
/// out-of-fold raw scores (spec.md §4.5 step 5). Falls back to Platt
/// scaling when the source data is too small or the isotonic fit would
/// be degenerate (fewer than two distinct raw scores).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Calibrator {
    Isotonic { thresholds: Vec<f32>, values: Vec<f32> },
    Platt { a: f32, b: f32 },
}

impl Calibrator {
    pub fn apply(&self, raw: f32) -> f32 {
        match self {
            Calibrator::Isotonic { thresholds, values } => isotonic_lookup(thresholds, values, raw),
            Calibrator::Platt { a, b } => 1.0 / (1.0 + (-(a * raw + b)).exp()),
        }
    }

    /// Fits an isotonic regressor by PAVA when there are enough distinct
    /// out-of-fold points (spec.md §4.5 step 5: "when the source data is
    /// small or monotonically ill-conditioned, fall back to Platt
    /// scaling"); otherwise falls back to Platt scaling via a short
    /// gradient descent on the 1-D logistic fit.
    pub fn fit(raw: &[f32], labels: &[bool]) -> Self {
        let mut distinct: Vec<f32> = raw.to_vec();
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap());
        distinct.dedup();

        if distinct.len() < 2 || raw.len() < 10 {
            return Self::fit_platt(raw, labels);
        }
        Self::fit_isotonic(raw, labels)
    }

    fn fit_isotonic(raw: &[f32], labels: &[bool]) -> Self {
        let mut order: Vec<usize> = (0..raw.len()).collect();
        order.sort_by(|&a, &b| raw[a].partial_cmp(&raw[b]).unwrap());

        let mut thresholds: Vec<f32> = order.iter().map(|&i| raw[i]).collect();
        let mut values: Vec<f32> = order.iter().map(|&i| if labels[i] { 1.0 } else { 0.0 }).collect();
        let mut weights: Vec<f32> = vec![1.0; values.len()];

        // Pool-adjacent-violators: merge neighboring blocks while the
        // sequence is non-monotone, keeping weighted means.
        let mut i = 0;
        while i + 1 < values.len() {
            if values[i] > values[i + 1] {
                let merged_weight = weights[i] + weights[i + 1];
                let merged_value = (values[i] * weights[i] + values[i + 1] * weights[i + 1]) / merged_weight;
                values[i] = merged_value;
                weights[i] = merged_weight;
                thresholds[i] = thresholds[i + 1];
                values.remove(i + 1);
                weights.remove(i + 1);
                thresholds.remove(i + 1);
                if i > 0 {
                    i -= 1;
                }
            } else {
                i += 1;
            }
        }

        Calibrator::Isotonic { thresholds, values }
    }

    fn fit_platt(raw: &[f32], labels: &[bool]) -> Self {
        let (mut a, mut b) = (1.0f32, 0.0f32);
        let lr = 0.05;
        let n = raw.len().max(1) as f32;
        for _ in 0..500 {
            let mut grad_a = 0.0f32;
            let mut grad_b = 0.0f32;
            for (&x, &y) in raw.iter().zip(labels) {
                let p = 1.0 / (1.0 + (-(a * x + b)).exp());
                let err = p - if y { 1.0 } else { 0.0 };
                grad_a += err * x;
                grad_b += err;
            }
            a -= lr * grad_a / n;
            b -= lr * grad_b / n;
        }
        Calibrator::Platt { a, b }
    }
}

/// Step-function lookup: the value associated with the largest threshold
/// not exceeding `raw`, or the first value if `raw` is below every
/// threshold (monotone extrapolation at the boundaries).
fn isotonic_lookup(thresholds: &[f32], values: &[f32], raw: f32) -> f32 {
    match thresholds.binary_search_by(|t| t.partial_cmp(&raw).unwrap()) {
        Ok(i) => values[i],
        Err(0) => values[0],
        Err(i) if i >= thresholds.len() => *values.last().unwrap(),
        Err(i) => values[i - 1],
    }
}
