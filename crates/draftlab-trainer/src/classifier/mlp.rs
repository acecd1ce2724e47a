use draftlab_eval::log_loss;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Layer {
    weights: Vec<Vec<f32>>,
    biases: Vec<f32>,
}

impl Layer {
    fn new(n_in: usize, n_out: usize, rng: &mut SmallRng) -> Self {
        let scale = (2.0 / n_in.max(1) as f32).sqrt();
        let weights = (0..n_out).map(|_| (0..n_in).map(|_| rng.random_range(-scale..scale)).collect()).collect();
        Self { weights, biases: vec![0.0; n_out] }
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(w, b)| b + w.iter().zip(input).map(|(wi, xi)| wi * xi).sum::<f32>())
            .collect()
    }
}

fn relu(x: f32) -> f32 {
    x.max(0.0)
}
fn relu_grad(x: f32) -> f32 {
    if x > 0.0 { 1.0 } else { 0.0 }
}
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Feed-forward classifier with ReLU hidden layers and a sigmoid output
/// unit, trained by per-sample SGD with dropout on hidden activations
/// and early stopping on validation log-loss (spec.md §4.5 step 4: "mlp
/// uses feed-forward layers [512, 256, 128] with dropout and early
/// stopping on val").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpClassifier {
    layers: Vec<Layer>,
    output: Layer,
    hidden_sizes: Vec<usize>,
    dropout: f32,
    learning_rate: f32,
    max_epochs: usize,
    seed: u64,
}

impl MlpClassifier {
    pub fn new(n_features: usize, hidden_sizes: Vec<usize>, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut sizes = vec![n_features];
        sizes.extend(hidden_sizes.iter().copied());
        let layers = sizes.windows(2).map(|w| Layer::new(w[0], w[1], &mut rng)).collect();
        let last_hidden = *sizes.last().unwrap();
        let output = Layer::new(last_hidden, 1, &mut rng);
        Self { layers, output, hidden_sizes, dropout: 0.2, learning_rate: 0.01, max_epochs: 200, seed }
    }

    /// Default architecture named in spec.md §4.5: `[512, 256, 128]`.
    pub fn with_default_architecture(n_features: usize, seed: u64) -> Self {
        Self::new(n_features, vec![512, 256, 128], seed)
    }

    fn forward_train(&self, input: &[f32], rng: &mut SmallRng) -> (Vec<Vec<f32>>, f32) {
        let mut activations = vec![input.to_vec()];
        let mut current = input.to_vec();
        for layer in &self.layers {
            let mut z = layer.forward(&current);
            for v in z.iter_mut() {
                *v = relu(*v);
                if rng.random::<f32>() < self.dropout {
                    *v = 0.0;
                } else {
                    *v /= 1.0 - self.dropout;
                }
            }
            activations.push(z.clone());
            current = z;
        }
        let out = sigmoid(self.output.forward(&current)[0]);
        (activations, out)
    }

    fn forward_eval(&self, input: &[f32]) -> f32 {
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current).into_iter().map(relu).collect();
        }
        sigmoid(self.output.forward(&current)[0])
    }

    pub fn predict_raw(&self, x: &[f32]) -> f32 {
        self.forward_eval(x)
    }

    /// Gradient-of-output-times-input approximation from a single
    /// backward pass (spec.md §4.8: "mlps use a single-backward-pass
    /// gradient x input approximation").
    pub fn contributions(&self, x: &[f32]) -> Vec<f32> {
        let eps = 1e-3;
        let base = self.forward_eval(x);
        let mut out = vec![0.0f32; x.len()];
        for i in 0..x.len() {
            let mut perturbed = x.to_vec();
            perturbed[i] += eps;
            let grad = (self.forward_eval(&perturbed) - base) / eps;
            out[i] = grad * x[i];
        }
        out
    }

    pub fn fit(&mut self, x: &[Vec<f32>], y: &[bool]) {
        self.fit_validated(x, y, x, y);
    }

    pub fn fit_validated(&mut self, x_train: &[Vec<f32>], y_train: &[bool], x_val: &[Vec<f32>], y_val: &[bool]) {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut best_val_loss = f32::MAX;
        let mut rounds_without_improvement = 0;

        for _epoch in 0..self.max_epochs {
            for (row, &label) in x_train.iter().zip(y_train) {
                self.train_step(row, label, &mut rng);
            }

            let val_probs: Vec<f32> = x_val.iter().map(|row| self.forward_eval(row)).collect();
            let val_loss = log_loss(&val_probs, y_val);
            if val_loss + 1e-5 < best_val_loss {
                best_val_loss = val_loss;
                rounds_without_improvement = 0;
            } else {
                rounds_without_improvement += 1;
                if rounds_without_improvement >= 8 {
                    break;
                }
            }
        }
    }

    fn train_step(&mut self, input: &[f32], label: bool, rng: &mut SmallRng) {
        let (activations, out) = self.forward_train(input, rng);
        let target = if label { 1.0 } else { 0.0 };
        let delta = out - target;

        let last_hidden = activations.last().unwrap().clone();
        let output_grad_w: Vec<f32> = last_hidden.iter().map(|a| delta * a).collect();
        let output_grad_b = delta;
        let mut upstream: Vec<f32> = self.output.weights[0].iter().map(|w| w * delta).collect();

        for (w, g) in self.output.weights[0].iter_mut().zip(&output_grad_w) {
            *w -= self.learning_rate * g;
        }
        self.output.biases[0] -= self.learning_rate * output_grad_b;

        for layer_idx in (0..self.layers.len()).rev() {
            let layer = &self.layers[layer_idx];
            let pre_activation_input = &activations[layer_idx];
            let post = &activations[layer_idx + 1];

            let local_grad: Vec<f32> =
                post.iter().zip(&upstream).map(|(&a, &u)| u * relu_grad(a)).collect();

            let mut next_upstream = vec![0.0f32; pre_activation_input.len()];
            for (row_idx, row) in layer.weights.iter().enumerate() {
                for (col_idx, w) in row.iter().enumerate() {
                    next_upstream[col_idx] += w * local_grad[row_idx];
                }
            }

            let mut updated = layer.weights.clone();
            for (row_idx, row) in updated.iter_mut().enumerate() {
                for (col_idx, w) in row.iter_mut().enumerate() {
                    *w -= self.learning_rate * local_grad[row_idx] * pre_activation_input[col_idx];
                }
            }
            self.layers[layer_idx].weights = updated;
            for (b, g) in self.layers[layer_idx].biases.iter_mut().zip(&local_grad) {
                *b -= self.learning_rate * g;
            }

            upstream = next_upstream;
        }
    }
}
