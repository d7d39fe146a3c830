//! PolicyScout CLI: resolve a company to its domain and locate its legal
//! policy URLs, plus admin commands for the Carl scorer.
//!
//! Usage: policyscout discover netflix
//!        policyscout discover vercel.com --parallel --types privacy,terms
//!        policyscout carl stats

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use policyscout_common::{Config, PolicyType};
use policyscout_engine::{DiscoveryEngine, DiscoveryMode, Identifier};
use policyscout_neural::{JsonFileStore, NeuralScorer};

#[derive(Parser)]
#[command(name = "policyscout", about = "Locate company privacy and legal policy URLs")]
struct Cli {
    /// Directory for persisted Carl weights and training examples.
    #[arg(long, default_value = ".policyscout")]
    model_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an input and run the full discovery pipeline.
    Discover {
        /// Company name or domain ("netflix" or "netflix.com").
        input: String,
        /// Use the parallel worker pool instead of sequential strategies.
        #[arg(long)]
        parallel: bool,
        /// Comma-separated policy types to locate (default: privacy,terms).
        #[arg(long)]
        types: Option<String>,
        /// Override the overall wall-clock cap in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Skip the neural scorer even if weights exist.
        #[arg(long)]
        no_neural: bool,
    },
    /// Only resolve the input to a verified domain.
    Identify { input: String },
    /// Manage the Carl neural scorer.
    Carl {
        #[command(subcommand)]
        action: CarlAction,
    },
}

#[derive(Subcommand)]
enum CarlAction {
    /// Print generation, training count, and accuracy.
    Stats,
    /// Rebuild weights from the retained training examples.
    Retrain,
    /// Reinitialize weights and metadata.
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("policyscout=info".parse()?))
        .init();

    let cli = Cli::parse();
    let store = Arc::new(JsonFileStore::new(&cli.model_dir));

    match cli.command {
        Command::Discover {
            input,
            parallel,
            types,
            timeout_secs,
            no_neural,
        } => {
            let mut config = Config::default();
            if let Some(secs) = timeout_secs {
                config.discovery_timeout = std::time::Duration::from_secs(secs);
            }
            if let Some(types) = types {
                let mut requested = Vec::new();
                for part in types.split(',') {
                    let part = part.trim();
                    if part.is_empty() {
                        continue;
                    }
                    requested.push(
                        PolicyType::from_str(part).map_err(|e| anyhow::anyhow!(e))?,
                    );
                }
                if !requested.is_empty() {
                    config.requested_types = requested;
                }
            }

            let mut engine = DiscoveryEngine::new(config);
            if !no_neural {
                let scorer = NeuralScorer::load(store).await;
                engine = engine.with_scorer(scorer);
            }

            let identifier = Identifier::new(engine.client().clone());
            let identity = identifier.identify(&input).await?;
            info!(
                input = input.as_str(),
                domain = identity.clean_domain.as_str(),
                "Input resolved"
            );

            let mode = if parallel {
                DiscoveryMode::Parallel
            } else {
                DiscoveryMode::Sequential
            };
            let result = engine.discover_with_mode(&identity.clean_domain, mode).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Identify { input } => {
            let engine = DiscoveryEngine::new(Config::default());
            let identifier = Identifier::new(engine.client().clone());
            let identity = identifier.identify(&input).await?;
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }
        Command::Carl { action } => {
            let scorer = NeuralScorer::load(store).await;
            match action {
                CarlAction::Stats => {
                    let stats = scorer.stats().await;
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                CarlAction::Retrain => {
                    let stats = scorer.retrain().await?;
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                CarlAction::Reset => {
                    scorer.reset().await?;
                    println!("Carl reset to fresh weights");
                }
            }
        }
    }

    Ok(())
}
