//! Persistence seam for the neural scorer. The engine works against the
//! `ModelStore` trait; the host application decides where weights and
//! training examples actually live. Two implementations ship here: an
//! in-memory store for tests and a JSON-file store for standalone runs.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::network::CarlNetwork;

/// Cap on retained training examples, most-recent-first.
pub const MAX_TRAINING_EXAMPLES: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    /// 24 floats, each in [0,1].
    pub features: Vec<f64>,
    /// 0.0 or 1.0.
    pub target: f64,
    pub domain: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub feedback: Option<String>,
}

#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Load the persisted network, if any. A missing model is `Ok(None)`.
    async fn load_model(&self) -> Result<Option<CarlNetwork>>;
    async fn save_model(&self, model: &CarlNetwork) -> Result<()>;
    /// Append one example, evicting the oldest past the retention cap.
    async fn append_training_example(&self, example: &TrainingExample) -> Result<()>;
    /// Read up to `limit` examples, most recent first.
    async fn read_training_examples(&self, limit: usize) -> Result<Vec<TrainingExample>>;
}

// --- In-memory store (tests, degraded mode) ---

#[derive(Default)]
pub struct MemoryStore {
    model: Mutex<Option<CarlNetwork>>,
    examples: Mutex<VecDeque<TrainingExample>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModelStore for MemoryStore {
    async fn load_model(&self) -> Result<Option<CarlNetwork>> {
        Ok(self.model.lock().expect("store mutex poisoned").clone())
    }

    async fn save_model(&self, model: &CarlNetwork) -> Result<()> {
        *self.model.lock().expect("store mutex poisoned") = Some(model.clone());
        Ok(())
    }

    async fn append_training_example(&self, example: &TrainingExample) -> Result<()> {
        let mut examples = self.examples.lock().expect("store mutex poisoned");
        examples.push_front(example.clone());
        examples.truncate(MAX_TRAINING_EXAMPLES);
        Ok(())
    }

    async fn read_training_examples(&self, limit: usize) -> Result<Vec<TrainingExample>> {
        let examples = self.examples.lock().expect("store mutex poisoned");
        Ok(examples.iter().take(limit).cloned().collect())
    }
}

// --- JSON-file store ---

/// File layout: `<dir>/carl_model.json` for the weight blob,
/// `<dir>/carl_examples.jsonl` for training examples (one JSON per line,
/// append order = chronological).
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn model_path(&self) -> PathBuf {
        self.dir.join("carl_model.json")
    }

    fn examples_path(&self) -> PathBuf {
        self.dir.join("carl_examples.jsonl")
    }
}

#[async_trait]
impl ModelStore for JsonFileStore {
    async fn load_model(&self) -> Result<Option<CarlNetwork>> {
        let path = self.model_path();
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context(format!("reading {}", path.display())),
        };
        let model: CarlNetwork =
            serde_json::from_str(&raw).context("parsing persisted weight blob")?;
        model.validate().map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(Some(model))
    }

    async fn save_model(&self, model: &CarlNetwork) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("creating model directory")?;
        let json = serde_json::to_string(model).context("serializing weight blob")?;
        tokio::fs::write(self.model_path(), json)
            .await
            .context("writing weight blob")?;
        Ok(())
    }

    async fn append_training_example(&self, example: &TrainingExample) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("creating model directory")?;
        let mut line = serde_json::to_string(example).context("serializing example")?;
        line.push('\n');

        let path = self.examples_path();
        let existing = tokio::fs::read_to_string(&path).await.unwrap_or_default();
        let mut lines: Vec<&str> = existing.lines().collect();
        // Keep the newest examples when the cap is hit (file order is oldest first).
        if lines.len() >= MAX_TRAINING_EXAMPLES {
            lines = lines[lines.len() + 1 - MAX_TRAINING_EXAMPLES..].to_vec();
        }
        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&line);
        tokio::fs::write(&path, out)
            .await
            .context("writing examples file")?;
        Ok(())
    }

    async fn read_training_examples(&self, limit: usize) -> Result<Vec<TrainingExample>> {
        let raw = match tokio::fs::read_to_string(self.examples_path()).await {
            Ok(raw) => raw,
            // Missing table/file means "no data", not an error.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("reading examples file"),
        };
        let mut examples: Vec<TrainingExample> = Vec::new();
        for line in raw.lines() {
            match serde_json::from_str(line) {
                Ok(ex) => examples.push(ex),
                Err(e) => warn!(error = %e, "Skipping unparseable training example line"),
            }
        }
        examples.reverse();
        examples.truncate(limit);
        Ok(examples)
    }
}
