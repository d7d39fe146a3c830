pub mod features;
pub mod network;
pub mod scorer;
pub mod store;

pub use features::extract_features;
pub use network::{CarlNetwork, INPUT_SIZE};
pub use scorer::{ConfidenceBand, NeuralScorer, Prediction, ScorerStats};
pub use store::{JsonFileStore, MemoryStore, ModelStore, TrainingExample};
