//! CLI entry point for a persona-evolution run: parses arguments, builds
//! the configured backends/operators, and drives `EvolutionEngine` to
//! completion (or a clean resume exit). Grounded on `beagle-bin`'s
//! `tracing_subscriber::fmt` bootstrap and `beagle-stress-test`'s
//! `clap::Parser`-derived argument struct.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use evo_core::EvoError;
use evo_engine::EvolutionEngine;
use evo_evaluator::{BackendEvaluator, Evaluator, HeuristicEvaluator};
use evo_genetics::{BackendMutator, Mutator, PoolMutator};
use evo_llm::{
    EmbeddingBackend, HashEmbeddingBackend, HttpEmbeddingBackend, HttpTextBackend, ScriptedBackend,
    TextBackend,
};
use evo_store::Store;
use tracing::error;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TextBackendKind {
    Http,
    Scripted,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EmbeddingBackendKind {
    Http,
    Hash,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EvaluatorKind {
    Heuristic,
    Backend,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MutatorKind {
    Pool,
    Backend,
}

/// Runs (or resumes) a persona-evolution simulation to completion.
#[derive(Parser, Debug)]
#[command(author, version, about = "Runs a persona-evolution simulation to completion or resumes an existing one")]
struct Args {
    /// Directory holding this run's generations, transcripts, and stats log.
    #[arg(long)]
    run_dir: PathBuf,

    /// Optional JSON file overriding engine defaults (population size,
    /// generations, fitness weights, niching, ...).
    #[arg(long)]
    engine_config: Option<PathBuf>,

    /// JSON file with the seed persona genotypes. Required unless
    /// resuming a run that already has at least one saved generation.
    #[arg(long)]
    seed_personas: Option<PathBuf>,

    /// Optional JSON file with the structural mutator's value catalog.
    /// Falls back to a small built-in catalog when omitted.
    #[arg(long)]
    mutation_pools: Option<PathBuf>,

    /// Base seed this run's per-generation RNGs are derived from.
    #[arg(long, default_value_t = 0)]
    rng_seed: u64,

    #[arg(long, value_enum, default_value_t = TextBackendKind::Scripted)]
    text_backend: TextBackendKind,

    #[arg(long, value_enum, default_value_t = EmbeddingBackendKind::Hash)]
    embedding_backend: EmbeddingBackendKind,

    #[arg(long, value_enum, default_value_t = EvaluatorKind::Heuristic)]
    evaluator: EvaluatorKind,

    #[arg(long, value_enum, default_value_t = MutatorKind::Pool)]
    mutator: MutatorKind,

    #[arg(long, env = "EVO_TEXT_API_BASE_URL")]
    text_api_base_url: Option<String>,

    #[arg(long, env = "EVO_TEXT_API_KEY")]
    text_api_key: Option<String>,

    #[arg(long, env = "EVO_EMBEDDING_API_BASE_URL")]
    embedding_api_base_url: Option<String>,

    #[arg(long, default_value = "default")]
    embedding_model: String,

    #[arg(long, default_value_t = 256)]
    hash_embedding_dimensions: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            let code = e
                .downcast_ref::<EvoError>()
                .map(EvoError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let store = Store::new(args.run_dir.clone())?;
    let config = evo_config::load_engine_config(args.engine_config.as_deref())?;
    let pools = evo_config::load_mutation_pools(args.mutation_pools.as_deref())?;

    let seeds = match args.seed_personas.as_deref() {
        Some(path) => evo_config::load_seed_personas(path)?,
        None => Vec::new(),
    };

    let backend: Arc<dyn TextBackend> = match args.text_backend {
        TextBackendKind::Http => {
            let base_url = args
                .text_api_base_url
                .context("--text-api-base-url is required for the http text backend")?;
            let api_key = args.text_api_key.unwrap_or_default();
            Arc::new(HttpTextBackend::new(base_url, api_key)?)
        }
        TextBackendKind::Scripted => Arc::new(ScriptedBackend::new("[no response configured]")),
    };

    let embedder: Arc<dyn EmbeddingBackend> = match args.embedding_backend {
        EmbeddingBackendKind::Http => {
            let base_url = args
                .embedding_api_base_url
                .context("--embedding-api-base-url is required for the http embedding backend")?;
            Arc::new(HttpEmbeddingBackend::new(base_url, args.embedding_model)?)
        }
        EmbeddingBackendKind::Hash => Arc::new(HashEmbeddingBackend::new(args.hash_embedding_dimensions)),
    };

    let mutator: Arc<dyn Mutator> = match args.mutator {
        MutatorKind::Pool => Arc::new(PoolMutator::new(pools.clone())),
        MutatorKind::Backend => Arc::new(BackendMutator::new(backend.clone(), pools.clone())),
    };

    let evaluator: Arc<dyn Evaluator> = match args.evaluator {
        EvaluatorKind::Heuristic => Arc::new(HeuristicEvaluator::new(embedder.clone())),
        EvaluatorKind::Backend => Arc::new(BackendEvaluator::new(backend.clone())),
    };

    let engine = EvolutionEngine::new(config, backend, embedder, mutator, evaluator, pools, store, args.rng_seed)?;
    engine.run(seeds).await
}
