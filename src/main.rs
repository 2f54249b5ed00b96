//! Privacy Risk - Command Line Entry Point
//!
//! `generate` writes a synthetic labelled corpus, `train` fits a model bundle
//! from a corpus, `assess` scores one device request against a saved bundle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use privacy_risk_core::constants::{APP_VERSION, DEFAULT_SAMPLES, DEFAULT_SEED};
use privacy_risk_core::logic::assessment::{AssessmentEngine, AssessmentRequest, ModelBundle};
use privacy_risk_core::logic::config::EngineConfig;
use privacy_risk_core::logic::dataset::{
    generate_corpus, read_corpus, train_and_save, write_corpus, CorpusSummary,
};
use privacy_risk_core::logic::knowledge::{InMemoryKnowledgeStore, KnowledgeBaseHandler};
use privacy_risk_core::logic::record::Device;

/// Privacy risk assessment for IoT devices
#[derive(Parser)]
#[command(name = "privacy-risk")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Model directory (overrides PRIVACY_RISK_MODEL_DIR)
    #[arg(short, long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic labelled corpus as CSV
    Generate {
        /// Output CSV path
        #[arg(short, long, default_value = "privacy_dataset.csv")]
        output: PathBuf,

        /// Number of rows
        #[arg(short, long, default_value_t = DEFAULT_SAMPLES)]
        samples: usize,

        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Train transformer and classifier, save them to the model directory
    Train {
        /// Labelled corpus; a synthetic one is generated when absent
        #[arg(short, long)]
        corpus: Option<PathBuf>,

        /// Rows of the generated corpus
        #[arg(short, long, default_value_t = DEFAULT_SAMPLES)]
        samples: usize,
    },

    /// Assess a device request (JSON: {"device": ..., "request": ...})
    Assess {
        /// Request file
        input: PathBuf,
    },
}

#[derive(Deserialize)]
struct AssessInput {
    device: Device,
    request: AssessmentRequest,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = EngineConfig::from_env();
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }

    log::info!("privacy-risk v{}", APP_VERSION);

    match cli.command {
        Commands::Generate {
            output,
            samples,
            seed,
        } => generate(&output, samples, seed),
        Commands::Train { corpus, samples } => train(&config, corpus.as_deref(), samples),
        Commands::Assess { input } => assess(&config, &input),
    }
}

fn generate(output: &Path, samples: usize, seed: u64) -> Result<()> {
    let corpus = generate_corpus(samples, seed);
    write_corpus(output, &corpus).with_context(|| format!("writing corpus to {}", output.display()))?;

    let summary = CorpusSummary::from_corpus(&corpus);
    println!("{}", serde_json::to_string_pretty(&summary.level_counts)?);
    Ok(())
}

fn train(config: &EngineConfig, corpus: Option<&Path>, samples: usize) -> Result<()> {
    let corpus = match corpus {
        Some(path) => read_corpus(path).with_context(|| format!("reading corpus {}", path.display()))?,
        None => generate_corpus(samples, config.forest.seed),
    };

    let report = train_and_save(&corpus, config, &config.model_dir)
        .with_context(|| format!("training into {}", config.model_dir.display()))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn assess(config: &EngineConfig, input: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading request {}", input.display()))?;
    let AssessInput { device, request } =
        serde_json::from_str(&text).context("parsing assessment request")?;

    let store = match &config.knowledge_base {
        Some(path) => InMemoryKnowledgeStore::load(path)
            .with_context(|| format!("loading knowledge base {}", path.display()))?,
        None => InMemoryKnowledgeStore::with_defaults(),
    };

    let bundle = ModelBundle::load(&config.model_dir)
        .with_context(|| format!("loading model bundle from {}", config.model_dir.display()))?;

    let engine = AssessmentEngine::new(KnowledgeBaseHandler::new(store));
    engine.publish(bundle);

    let result = engine
        .assess(&device, &request)
        .with_context(|| format!("assessing device {}", device.id))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
