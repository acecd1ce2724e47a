use serde::Deserialize;
use serde::Serialize;

/// L2-regularized logistic regression, fit by full-batch gradient descent
/// (spec.md §4.5 step 4: "linear uses L2-regularized logistic
/// regression").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub weights: Vec<f32>,
    pub bias: f32,
    l2: f32,
    learning_rate: f32,
    epochs: usize,
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticClassifier {
    pub fn new(n_features: usize) -> Self {
        Self { weights: vec![0.0; n_features], bias: 0.0, l2: 1e-3, learning_rate: 0.1, epochs: 300 }
    }

    pub fn fit(&mut self, x: &[Vec<f32>], y: &[bool]) {
        let n = x.len().max(1) as f32;
        for _ in 0..self.epochs {
            let mut grad_w = vec![0.0f32; self.weights.len()];
            let mut grad_b = 0.0f32;
            for (row, &label) in x.iter().zip(y) {
                let z = self.score(row);
                let p = sigmoid(z);
                let err = p - if label { 1.0 } else { 0.0 };
                for (g, &xi) in grad_w.iter_mut().zip(row) {
                    *g += err * xi;
                }
                grad_b += err;
            }
            for (w, g) in self.weights.iter_mut().zip(&grad_w) {
                *w -= self.learning_rate * (g / n + self.l2 * *w);
            }
            self.bias -= self.learning_rate * grad_b / n;
        }
    }

    fn score(&self, x: &[f32]) -> f32 {
        self.bias + self.weights.iter().zip(x).map(|(w, xi)| w * xi).sum::<f32>()
    }

    pub fn predict_raw(&self, x: &[f32]) -> f32 {
        sigmoid(self.score(x))
    }

    /// Signed coefficient times feature value (spec.md §4.8).
    pub fn contributions(&self, x: &[f32]) -> Vec<f32> {
        self.weights.iter().zip(x).map(|(w, xi)| w * xi).collect()
    }
}
