//! Generation-loop orchestration: config, group assembly, topic
//! production, fitness aggregation, niching, selection, and the
//! `EvolutionEngine` driver that ties them together (§4.7). Grounded on
//! `beagle_agents::darwin_cycle::DarwinCycle::evolve`'s single
//! generation-stepping entry point.

mod config;
mod engine;
mod fitness;
mod groups;
mod niching;
mod selection;
mod topics;

pub use config::{EngineConfig, NichingConfig};
pub use engine::EvolutionEngine;
pub use fitness::{aggregate_raw_fitness, normalize_weights};
pub use groups::assemble_groups;
pub use niching::apply_niching;
pub use selection::{select_elites, tournament_select};
pub use topics::{produce_topics, FALLBACK_TOPICS};

use std::collections::BTreeMap;

use evo_core::Transcript;
use evo_llm::EmbeddingBackend;

/// Population-level textual diversity for a generation's statistics
/// record (§4.6): for each agent, the mean embedding of every text it
/// contributed across all of this generation's transcripts; then the
/// mean pairwise cosine distance between agents' mean embeddings.
pub(crate) async fn population_textual_diversity(
    transcripts: &[Transcript],
    embedder: &dyn EmbeddingBackend,
) -> f64 {
    let mut by_author: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for transcript in transcripts {
        for event in transcript {
            if let Some(content) = event.content() {
                by_author.entry(event.author()).or_default().push(content.to_string());
            }
        }
    }

    let mut mean_embeddings = Vec::with_capacity(by_author.len());
    for (author, texts) in &by_author {
        match evo_diversity::mean_embedding(texts, embedder).await {
            Ok(Some(embedding)) => mean_embeddings.push(embedding),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, author, "embedding failed, excluding agent from diversity"),
        }
    }

    evo_diversity::population_diversity(&mean_embeddings)
}
