//! Multi-objective fitness evaluation: a deterministic heuristic
//! evaluator and a backend/judge evaluator with a degraded-mode
//! fallback. Grounded on
//! `beagle_agents::darwin_cycle::{evaluate_population, evaluate_with_providers}`.

mod backend_judge;
mod heuristic;

use async_trait::async_trait;
use evo_core::{FitnessScores, Transcript};

pub use backend_judge::BackendEvaluator;
pub use heuristic::HeuristicEvaluator;

/// Single-method capability: score one individual's contributions across
/// the transcripts of its generation (§4.6). `persona_summary` is a short
/// rendering of the genotype, used only by backend-driven
/// implementations to build the judge prompt.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        name: &str,
        transcripts: &[Transcript],
        persona_summary: &str,
    ) -> FitnessScores;
}

pub const DEGRADED_KEY: &str = "degraded";
