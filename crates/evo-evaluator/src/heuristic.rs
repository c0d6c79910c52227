use async_trait::async_trait;
use evo_core::{FitnessScores, Transcript};
use evo_diversity::textual_diversity;
use evo_llm::EmbeddingBackend;

use crate::Evaluator;

/// Deterministic evaluator requiring no backend call (§4.6). Scores
/// `engagement` and `conversation_quality` from participation volume and
/// mean content length, holds `persona_fidelity`/`safety` at fixed
/// baselines, and delegates `diversity` to the per-agent textual
/// diversity measure. Grounded on
/// `beagle_agents::darwin_cycle::evaluate_population`'s per-individual
/// scan-the-transcript shape, with the LLM-judged dimensions replaced by
/// fixed baselines since this evaluator never calls a backend.
pub struct HeuristicEvaluator<E: EmbeddingBackend> {
    embedder: E,
}

impl<E: EmbeddingBackend> HeuristicEvaluator<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl<E: EmbeddingBackend + Send + Sync> Evaluator for HeuristicEvaluator<E> {
    async fn evaluate(
        &self,
        name: &str,
        transcripts: &[Transcript],
        _persona_summary: &str,
    ) -> FitnessScores {
        let contributions: Vec<&str> = transcripts
            .iter()
            .flatten()
            .filter(|event| event.author() == name)
            .filter_map(|event| event.content())
            .collect();

        let k = contributions.len();
        let mean_len = if k == 0 {
            0.0
        } else {
            contributions.iter().map(|c| c.chars().count()).sum::<usize>() as f64 / k as f64
        };

        let texts: Vec<String> = contributions.iter().map(|s| s.to_string()).collect();
        let diversity = textual_diversity(&texts, &self.embedder).await.unwrap_or(0.0);

        FitnessScores {
            engagement: (k as f64 * 0.2).min(1.0),
            conversation_quality: (mean_len / 100.0).min(1.0),
            diversity,
            persona_fidelity: 0.5,
            safety: 1.0,
            extra: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_core::TranscriptEvent;
    use evo_llm::HashEmbeddingBackend;

    fn transcript_for(name: &str, posts: &[&str]) -> Transcript {
        posts
            .iter()
            .map(|content| TranscriptEvent::Post {
                author: name.to_string(),
                content: content.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn no_contributions_gives_zero_engagement_and_quality() {
        let evaluator = HeuristicEvaluator::new(HashEmbeddingBackend::new(8));
        let transcripts = vec![transcript_for("other", &["hi"])];
        let scores = evaluator.evaluate("alice", &transcripts, "").await;
        assert_eq!(scores.engagement, 0.0);
        assert_eq!(scores.conversation_quality, 0.0);
        assert_eq!(scores.diversity, 0.0);
        assert_eq!(scores.persona_fidelity, 0.5);
        assert_eq!(scores.safety, 1.0);
    }

    #[tokio::test]
    async fn engagement_scales_with_event_count() {
        let evaluator = HeuristicEvaluator::new(HashEmbeddingBackend::new(8));
        let transcripts = vec![transcript_for("alice", &["a", "b", "c"])];
        let scores = evaluator.evaluate("alice", &transcripts, "").await;
        assert!((scores.engagement - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn engagement_caps_at_one() {
        let evaluator = HeuristicEvaluator::new(HashEmbeddingBackend::new(8));
        let posts = vec!["x"; 10];
        let transcripts = vec![transcript_for("alice", &posts)];
        let scores = evaluator.evaluate("alice", &transcripts, "").await;
        assert_eq!(scores.engagement, 1.0);
    }
}
