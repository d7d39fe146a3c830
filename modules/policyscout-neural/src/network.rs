//! The "Carl" network: a fixed 24→32→16→1 feed-forward net with sigmoid
//! activations, trained by stochastic backpropagation with classical
//! momentum. Small enough that plain `Vec` math beats pulling in a tensor
//! library: a forward pass is under 1 500 multiply-accumulates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use policyscout_common::PolicyScoutError;

pub const INPUT_SIZE: usize = 24;
pub const HIDDEN1_SIZE: usize = 32;
pub const HIDDEN2_SIZE: usize = 16;

pub const LEARNING_RATE: f64 = 0.15;
pub const MOMENTUM: f64 = 0.9;

/// Schema tag persisted with the weight blob; loads reject anything else.
pub const BLOB_VERSION: &str = "carl_v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarlNetwork {
    pub version: String,

    // Weight matrices, row-major: w1 is 32×24, w2 is 16×32, w3 is 1×16.
    w1: Vec<Vec<f64>>,
    w2: Vec<Vec<f64>>,
    w3: Vec<Vec<f64>>,
    b1: Vec<f64>,
    b2: Vec<f64>,
    b3: Vec<f64>,

    // Momentum velocities, same shapes as the weights/biases.
    vw1: Vec<Vec<f64>>,
    vw2: Vec<Vec<f64>>,
    vw3: Vec<Vec<f64>>,
    vb1: Vec<f64>,
    vb2: Vec<f64>,
    vb3: Vec<f64>,

    pub generation: u64,
    pub training_count: u64,
    /// Exact-match rate on the training set after the last retrain.
    pub accuracy: f64,
    pub last_trained_at: Option<DateTime<Utc>>,
}

fn sigmoid(x: f64) -> f64 {
    let x = x.clamp(-500.0, 500.0);
    1.0 / (1.0 + (-x).exp())
}

/// Standard-normal sample via Box–Muller over two uniform draws.
fn gaussian(rng: &mut impl rand::Rng) -> f64 {
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn init_matrix(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    let mut rng = rand::rng();
    let std_dev = 1.0 / (cols as f64).sqrt();
    (0..rows)
        .map(|_| (0..cols).map(|_| gaussian(&mut rng) * std_dev).collect())
        .collect()
}

fn zero_matrix(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    vec![vec![0.0; cols]; rows]
}

impl CarlNetwork {
    /// Fresh network with N(0, 1/√fan_in) weights, zero biases and
    /// velocities, zero metadata.
    pub fn new() -> Self {
        Self {
            version: BLOB_VERSION.to_string(),
            w1: init_matrix(HIDDEN1_SIZE, INPUT_SIZE),
            w2: init_matrix(HIDDEN2_SIZE, HIDDEN1_SIZE),
            w3: init_matrix(1, HIDDEN2_SIZE),
            b1: vec![0.0; HIDDEN1_SIZE],
            b2: vec![0.0; HIDDEN2_SIZE],
            b3: vec![0.0; 1],
            vw1: zero_matrix(HIDDEN1_SIZE, INPUT_SIZE),
            vw2: zero_matrix(HIDDEN2_SIZE, HIDDEN1_SIZE),
            vw3: zero_matrix(1, HIDDEN2_SIZE),
            vb1: vec![0.0; HIDDEN1_SIZE],
            vb2: vec![0.0; HIDDEN2_SIZE],
            vb3: vec![0.0; 1],
            generation: 0,
            training_count: 0,
            accuracy: 0.0,
            last_trained_at: None,
        }
    }

    /// Reject blobs whose schema tag or matrix dimensions do not match the
    /// compile-time constants.
    pub fn validate(&self) -> Result<(), PolicyScoutError> {
        if self.version != BLOB_VERSION {
            return Err(PolicyScoutError::Persistence(format!(
                "unknown weight blob version '{}'",
                self.version
            )));
        }
        let dims_ok = self.w1.len() == HIDDEN1_SIZE
            && self.w1.iter().all(|r| r.len() == INPUT_SIZE)
            && self.w2.len() == HIDDEN2_SIZE
            && self.w2.iter().all(|r| r.len() == HIDDEN1_SIZE)
            && self.w3.len() == 1
            && self.w3.iter().all(|r| r.len() == HIDDEN2_SIZE)
            && self.b1.len() == HIDDEN1_SIZE
            && self.b2.len() == HIDDEN2_SIZE
            && self.b3.len() == 1
            && self.vw1.len() == HIDDEN1_SIZE
            && self.vw2.len() == HIDDEN2_SIZE
            && self.vw3.len() == 1;
        if !dims_ok {
            return Err(PolicyScoutError::Persistence(
                "weight blob dimensions do not match the 24→32→16→1 topology".to_string(),
            ));
        }
        Ok(())
    }

    fn check_input(features: &[f64]) -> Result<(), PolicyScoutError> {
        if features.len() != INPUT_SIZE {
            return Err(PolicyScoutError::Dimension {
                expected: INPUT_SIZE,
                actual: features.len(),
            });
        }
        Ok(())
    }

    fn forward(&self, features: &[f64]) -> (Vec<f64>, Vec<f64>, f64) {
        let a1: Vec<f64> = (0..HIDDEN1_SIZE)
            .map(|i| {
                let sum: f64 = self.w1[i]
                    .iter()
                    .zip(features)
                    .map(|(w, x)| w * x)
                    .sum();
                sigmoid(sum + self.b1[i])
            })
            .collect();

        let a2: Vec<f64> = (0..HIDDEN2_SIZE)
            .map(|j| {
                let sum: f64 = self.w2[j].iter().zip(&a1).map(|(w, a)| w * a).sum();
                sigmoid(sum + self.b2[j])
            })
            .collect();

        let out_sum: f64 = self.w3[0].iter().zip(&a2).map(|(w, a)| w * a).sum();
        let out = sigmoid(out_sum + self.b3[0]);

        (a1, a2, out)
    }

    /// Forward pass. Fails explicitly on a wrong-length feature vector.
    pub fn predict(&self, features: &[f64]) -> Result<f64, PolicyScoutError> {
        Self::check_input(features)?;
        Ok(self.forward(features).2)
    }

    /// One stochastic gradient step with momentum. Increments
    /// `training_count`; the caller owns `generation`.
    pub fn train_step(&mut self, features: &[f64], target: f64) -> Result<f64, PolicyScoutError> {
        Self::check_input(features)?;

        let (a1, a2, out) = self.forward(features);

        // Output delta (sigmoid derivative applied to the squared-error grad).
        let delta3 = (out - target) * out * (1.0 - out);

        // Hidden deltas use the pre-update weights.
        let delta2: Vec<f64> = (0..HIDDEN2_SIZE)
            .map(|j| a2[j] * (1.0 - a2[j]) * self.w3[0][j] * delta3)
            .collect();
        let delta1: Vec<f64> = (0..HIDDEN1_SIZE)
            .map(|i| {
                let upstream: f64 = (0..HIDDEN2_SIZE).map(|j| self.w2[j][i] * delta2[j]).sum();
                a1[i] * (1.0 - a1[i]) * upstream
            })
            .collect();

        // Output layer.
        for j in 0..HIDDEN2_SIZE {
            let grad = delta3 * a2[j];
            self.vw3[0][j] = MOMENTUM * self.vw3[0][j] - LEARNING_RATE * grad;
            self.w3[0][j] += self.vw3[0][j];
        }
        self.vb3[0] = MOMENTUM * self.vb3[0] - LEARNING_RATE * delta3;
        self.b3[0] += self.vb3[0];

        // Second hidden layer.
        for j in 0..HIDDEN2_SIZE {
            for i in 0..HIDDEN1_SIZE {
                let grad = delta2[j] * a1[i];
                self.vw2[j][i] = MOMENTUM * self.vw2[j][i] - LEARNING_RATE * grad;
                self.w2[j][i] += self.vw2[j][i];
            }
            self.vb2[j] = MOMENTUM * self.vb2[j] - LEARNING_RATE * delta2[j];
            self.b2[j] += self.vb2[j];
        }

        // First hidden layer.
        for i in 0..HIDDEN1_SIZE {
            for k in 0..INPUT_SIZE {
                let grad = delta1[i] * features[k];
                self.vw1[i][k] = MOMENTUM * self.vw1[i][k] - LEARNING_RATE * grad;
                self.w1[i][k] += self.vw1[i][k];
            }
            self.vb1[i] = MOMENTUM * self.vb1[i] - LEARNING_RATE * delta1[i];
            self.b1[i] += self.vb1[i];
        }

        self.training_count += 1;
        Ok(out)
    }

    /// Reinitialize weights, zero velocities and metadata.
    pub fn reset(&mut self) {
        *self = CarlNetwork::new();
    }
}

impl Default for CarlNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_vec(fill: f64) -> Vec<f64> {
        vec![fill; INPUT_SIZE]
    }

    #[test]
    fn predict_is_in_unit_interval() {
        let net = CarlNetwork::new();
        let score = net.predict(&feature_vec(0.5)).unwrap();
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn wrong_length_fails_explicitly() {
        let mut net = CarlNetwork::new();
        assert!(matches!(
            net.predict(&vec![0.5; 23]),
            Err(PolicyScoutError::Dimension { expected: 24, actual: 23 })
        ));
        assert!(net.train_step(&vec![0.5; 25], 1.0).is_err());
    }

    #[test]
    fn single_example_learning_is_monotone() {
        let mut net = CarlNetwork::new();
        let features = feature_vec(0.7);

        let before = net.predict(&features).unwrap();
        net.train_step(&features, 1.0).unwrap();
        let after_one = net.predict(&features).unwrap();
        assert!(after_one > before, "{after_one} !> {before}");

        net.train_step(&features, 1.0).unwrap();
        let after_two = net.predict(&features).unwrap();
        assert!(after_two > after_one);
    }

    #[test]
    fn repeated_negative_training_pushes_score_down() {
        let mut net = CarlNetwork::new();
        let features = feature_vec(0.9);
        for _ in 0..50 {
            net.train_step(&features, 0.0).unwrap();
        }
        let score = net.predict(&features).unwrap();
        assert!(score < 0.2, "score {score} should be driven below 0.2");
    }

    #[test]
    fn training_count_increments() {
        let mut net = CarlNetwork::new();
        let features = feature_vec(0.4);
        net.train_step(&features, 1.0).unwrap();
        net.train_step(&features, 1.0).unwrap();
        assert_eq!(net.training_count, 2);
    }

    #[test]
    fn reset_zeroes_metadata() {
        let mut net = CarlNetwork::new();
        net.train_step(&feature_vec(0.5), 1.0).unwrap();
        net.generation = 7;
        net.reset();
        assert_eq!(net.generation, 0);
        assert_eq!(net.training_count, 0);
        assert_eq!(net.accuracy, 0.0);
        assert!(net.last_trained_at.is_none());
    }

    #[test]
    fn blob_round_trips_and_validates() {
        let net = CarlNetwork::new();
        let json = serde_json::to_string(&net).unwrap();
        let restored: CarlNetwork = serde_json::from_str(&json).unwrap();
        restored.validate().unwrap();

        let mut bad = restored.clone();
        bad.version = "carl_v0".to_string();
        assert!(bad.validate().is_err());

        let mut truncated = net.clone();
        truncated.w1.pop();
        assert!(truncated.validate().is_err());
    }

    #[test]
    fn sigmoid_is_clamped() {
        assert!(sigmoid(1e9).is_finite());
        assert!(sigmoid(-1e9).is_finite());
        assert!(sigmoid(0.0) - 0.5 < 1e-12);
    }
}
