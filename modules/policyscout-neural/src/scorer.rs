//! Thread-safe handle around the Carl network. Reads (`predict`) share a
//! read lock; `train`/`retrain`/`reset` take the write lock, so a reader
//! never observes partially updated weights. Store failures degrade the
//! scorer to its in-memory weights instead of propagating.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use policyscout_common::PolicyScoutError;

use crate::network::CarlNetwork;
use crate::store::{ModelStore, TrainingExample, MAX_TRAINING_EXAMPLES};

/// Epochs run over the retained examples during a retrain.
pub const RETRAIN_EPOCHS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Raw network output in [0,1].
    pub score: f64,
    pub is_policy: bool,
    pub confidence: ConfidenceBand,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScorerStats {
    pub generation: u64,
    pub training_count: u64,
    pub accuracy: f64,
    pub last_trained_at: Option<chrono::DateTime<Utc>>,
}

pub struct NeuralScorer {
    store: Arc<dyn ModelStore>,
    network: RwLock<CarlNetwork>,
}

impl NeuralScorer {
    /// Load persisted weights, falling back to a random initialization when
    /// the store is empty or unavailable. Safe to call more than once; each
    /// call reads the same persisted state.
    pub async fn load(store: Arc<dyn ModelStore>) -> Arc<Self> {
        let network = match store.load_model().await {
            Ok(Some(model)) => {
                info!(
                    generation = model.generation,
                    training_count = model.training_count,
                    "Loaded persisted Carl weights"
                );
                model
            }
            Ok(None) => {
                info!("No persisted Carl weights, starting fresh");
                CarlNetwork::new()
            }
            Err(e) => {
                warn!(error = %e, "Weight load failed, continuing with fresh weights");
                CarlNetwork::new()
            }
        };
        Arc::new(Self {
            store,
            network: RwLock::new(network),
        })
    }

    /// Forward pass; concurrent-safe. Fails only on a wrong-length vector.
    pub async fn predict(&self, features: &[f64]) -> Result<Prediction, PolicyScoutError> {
        let network = self.network.read().await;
        let score = network.predict(features)?;
        let distance = (score - 0.5).abs();
        let confidence = if distance > 0.35 {
            ConfidenceBand::High
        } else if distance > 0.15 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        };
        Ok(Prediction {
            score,
            is_policy: score > 0.5,
            confidence,
        })
    }

    /// One training step. Bumps the generation, persists the example and the
    /// updated weights. Persistence failures are logged and swallowed.
    pub async fn train(
        &self,
        features: &[f64],
        target: f64,
        domain: &str,
        url: &str,
    ) -> Result<(), PolicyScoutError> {
        let snapshot = {
            let mut network = self.network.write().await;
            network.train_step(features, target)?;
            network.generation += 1;
            network.last_trained_at = Some(Utc::now());
            network.clone()
        };

        let example = TrainingExample {
            features: features.to_vec(),
            target,
            domain: domain.to_string(),
            url: url.to_string(),
            created_at: Utc::now(),
            feedback: None,
        };
        if let Err(e) = self.store.append_training_example(&example).await {
            warn!(error = %e, "Failed to persist training example");
        }
        if let Err(e) = self.store.save_model(&snapshot).await {
            warn!(error = %e, "Failed to persist weights after training");
        }
        Ok(())
    }

    /// Rebuild the network from the retained examples: fresh weights, then
    /// `RETRAIN_EPOCHS` passes in a newly shuffled order per epoch. Accuracy
    /// is the exact-match rate on the same examples afterwards.
    pub async fn retrain(&self) -> Result<ScorerStats, PolicyScoutError> {
        let mut examples = match self.store.read_training_examples(MAX_TRAINING_EXAMPLES).await {
            Ok(ex) => ex,
            Err(e) => {
                warn!(error = %e, "Could not read training examples, retraining on nothing");
                Vec::new()
            }
        };

        let snapshot = {
            let mut network = self.network.write().await;
            network.reset();

            for _ in 0..RETRAIN_EPOCHS {
                examples.shuffle(&mut rand::rng());
                for ex in &examples {
                    network.train_step(&ex.features, ex.target)?;
                }
            }

            let mut correct = 0usize;
            for ex in &examples {
                let score = network.predict(&ex.features)?;
                if (score > 0.5) == (ex.target > 0.5) {
                    correct += 1;
                }
            }
            network.generation = RETRAIN_EPOCHS;
            network.accuracy = if examples.is_empty() {
                0.0
            } else {
                correct as f64 / examples.len() as f64
            };
            network.last_trained_at = Some(Utc::now());
            network.clone()
        };

        info!(
            examples = examples.len(),
            accuracy = snapshot.accuracy,
            "Retrain complete"
        );

        if let Err(e) = self.store.save_model(&snapshot).await {
            warn!(error = %e, "Failed to persist weights after retrain");
        }

        Ok(ScorerStats {
            generation: snapshot.generation,
            training_count: snapshot.training_count,
            accuracy: snapshot.accuracy,
            last_trained_at: snapshot.last_trained_at,
        })
    }

    /// Reinitialize weights and metadata, then persist the blank slate.
    pub async fn reset(&self) -> Result<(), PolicyScoutError> {
        let snapshot = {
            let mut network = self.network.write().await;
            network.reset();
            network.clone()
        };
        if let Err(e) = self.store.save_model(&snapshot).await {
            warn!(error = %e, "Failed to persist weights after reset");
        }
        Ok(())
    }

    pub async fn stats(&self) -> ScorerStats {
        let network = self.network.read().await;
        ScorerStats {
            generation: network.generation,
            training_count: network.training_count,
            accuracy: network.accuracy,
            last_trained_at: network.last_trained_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use policyscout_common::LinkContext;

    fn store() -> Arc<dyn ModelStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn predict_rejects_wrong_length() {
        let scorer = NeuralScorer::load(store()).await;
        assert!(scorer.predict(&vec![0.1; 23]).await.is_err());
        assert!(scorer.predict(&vec![0.1; 24]).await.is_ok());
    }

    #[tokio::test]
    async fn training_round_trip_moves_score_and_generation() {
        let scorer = NeuralScorer::load(store()).await;
        scorer.reset().await.unwrap();

        let features = crate::features::extract_features(
            "Privacy Policy",
            "https://example.com/privacy-policy",
            LinkContext::Footer,
            "https://example.com",
            None,
        );

        let before = scorer.predict(&features).await.unwrap().score;
        scorer.train(&features, 1.0, "example.com", "https://example.com/privacy-policy")
            .await
            .unwrap();
        let after = scorer.predict(&features).await.unwrap().score;
        assert!(after > before);

        for _ in 0..50 {
            scorer.train(&features, 0.0, "example.com", "https://example.com/privacy-policy")
                .await
                .unwrap();
        }
        let suppressed = scorer.predict(&features).await.unwrap().score;
        assert!(suppressed < 0.2, "score {suppressed} should be < 0.2");

        let stats = scorer.stats().await;
        assert_eq!(stats.generation, 51);
        assert_eq!(stats.training_count, 51);
    }

    #[tokio::test]
    async fn retrain_sets_generation_to_epochs_and_measures_accuracy() {
        let scorer = NeuralScorer::load(store()).await;

        // Two cleanly separable examples, trained a few times each.
        let positive = vec![1.0; 24];
        let negative = vec![0.0; 24];
        for _ in 0..20 {
            scorer.train(&positive, 1.0, "a.com", "https://a.com/privacy").await.unwrap();
            scorer.train(&negative, 0.0, "a.com", "https://a.com/careers").await.unwrap();
        }

        let stats = scorer.retrain().await.unwrap();
        assert_eq!(stats.generation, RETRAIN_EPOCHS);
        assert!(stats.accuracy >= 0.9, "accuracy {} too low", stats.accuracy);
    }

    #[tokio::test]
    async fn predictions_band_by_distance_from_half() {
        let scorer = NeuralScorer::load(store()).await;
        let features = vec![1.0; 24];
        for _ in 0..100 {
            scorer.train(&features, 1.0, "a.com", "https://a.com/p").await.unwrap();
        }
        let prediction = scorer.predict(&features).await.unwrap();
        assert!(prediction.is_policy);
        assert_eq!(prediction.confidence, ConfidenceBand::High);
    }

    #[tokio::test]
    async fn survives_store_that_always_fails() {
        struct BrokenStore;
        #[async_trait::async_trait]
        impl ModelStore for BrokenStore {
            async fn load_model(&self) -> anyhow::Result<Option<CarlNetwork>> {
                anyhow::bail!("store offline")
            }
            async fn save_model(&self, _: &CarlNetwork) -> anyhow::Result<()> {
                anyhow::bail!("store offline")
            }
            async fn append_training_example(&self, _: &TrainingExample) -> anyhow::Result<()> {
                anyhow::bail!("store offline")
            }
            async fn read_training_examples(&self, _: usize) -> anyhow::Result<Vec<TrainingExample>> {
                anyhow::bail!("store offline")
            }
        }

        let scorer = NeuralScorer::load(Arc::new(BrokenStore)).await;
        let features = vec![0.5; 24];
        scorer.train(&features, 1.0, "a.com", "https://a.com/p").await.unwrap();
        assert!(scorer.predict(&features).await.is_ok());
        assert!(scorer.retrain().await.is_ok());
    }
}
