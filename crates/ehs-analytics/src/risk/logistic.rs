//! Binary logistic regression fitted by batch gradient descent.
//!
//! The feature spaces here are tiny (a couple of scores plus a handful of
//! one-hot blocks), so full-batch gradient descent with a fixed iteration
//! cap converges comfortably.

/// Binary logistic regression classifier.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
    learning_rate: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl LogisticRegression {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            weights: Vec::new(),
            intercept: 0.0,
            learning_rate: 0.1,
            max_iterations,
            tolerance: 1e-6,
        }
    }

    /// Fit on dense feature rows and 0/1 labels.
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) {
        let rows = features.len();
        if rows == 0 {
            return;
        }
        let width = features[0].len();
        self.weights = vec![0.0; width];
        self.intercept = 0.0;
        let scale = 1.0 / rows as f64;

        for _ in 0..self.max_iterations {
            let mut weight_grad = vec![0.0; width];
            let mut intercept_grad = 0.0;
            for (row, &label) in features.iter().zip(labels) {
                let residual = sigmoid(self.decision(row)) - label as f64;
                for (grad, value) in weight_grad.iter_mut().zip(row) {
                    *grad += residual * value;
                }
                intercept_grad += residual;
            }

            let mut max_step = (intercept_grad * scale).abs();
            for (weight, grad) in self.weights.iter_mut().zip(&weight_grad) {
                let step = grad * scale;
                *weight -= self.learning_rate * step;
                max_step = max_step.max(step.abs());
            }
            self.intercept -= self.learning_rate * intercept_grad * scale;

            if max_step < self.tolerance {
                break;
            }
        }
    }

    fn decision(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(row)
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }

    /// Probability of the positive class.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(self.decision(row))
    }

    pub fn predict(&self, row: &[f64]) -> u8 {
        if self.predict_proba(row) >= 0.5 { 1 } else { 0 }
    }

    /// Fraction of rows classified correctly.
    pub fn accuracy(&self, features: &[Vec<f64>], labels: &[u8]) -> f64 {
        if features.is_empty() {
            return 0.0;
        }
        let correct = features
            .iter()
            .zip(labels)
            .filter(|&(row, &label)| self.predict(row) == label)
            .count();
        correct as f64 / features.len() as f64
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
