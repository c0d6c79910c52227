use async_trait::async_trait;
use evo_core::{FitnessScores, Transcript};
use evo_llm::{GenerateOptions, TextBackend};
use serde::Deserialize;
use tracing::warn;

use crate::{Evaluator, DEGRADED_KEY};

/// Flat JSON shape requested from the judge backend. Grounded on
/// `beagle_llm::validation::ValidationResult`'s convention of a flat
/// `Serialize + Deserialize` struct for a scored/judged response.
#[derive(Debug, Deserialize)]
struct JudgeResponse {
    #[serde(default)]
    engagement: f64,
    #[serde(default)]
    conversation_quality: f64,
    #[serde(default)]
    diversity: f64,
    #[serde(default)]
    persona_fidelity: f64,
    #[serde(default)]
    safety: f64,
}

impl From<JudgeResponse> for FitnessScores {
    fn from(r: JudgeResponse) -> Self {
        FitnessScores {
            engagement: r.engagement.clamp(0.0, 1.0),
            conversation_quality: r.conversation_quality.clamp(0.0, 1.0),
            diversity: r.diversity.clamp(0.0, 1.0),
            persona_fidelity: r.persona_fidelity.clamp(0.0, 1.0),
            safety: r.safety.clamp(0.0, 1.0),
            extra: Default::default(),
        }
    }
}

fn degraded_fallback() -> FitnessScores {
    let mut extra = std::collections::BTreeMap::new();
    extra.insert(DEGRADED_KEY.to_string(), 1.0);
    FitnessScores {
        engagement: 0.1,
        conversation_quality: 0.0,
        diversity: 0.0,
        persona_fidelity: 0.0,
        safety: 1.0,
        extra,
    }
}

/// Strips a single leading/trailing fenced code block (```` ``` ```` or
/// ` ```json `) so a judge reply that wraps its JSON still parses.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Asks a single judge prompt to score a persona's contributions across
/// a generation's transcripts and parses the JSON response. Fails open
/// to a fixed degraded-mode score on any parse, schema, or transport
/// failure, per §4.6. Grounded on
/// `beagle_agents::darwin_cycle::evaluate_with_providers`'s
/// prompt-then-parse shape, collapsed from multiple providers to the
/// single configured backend.
pub struct BackendEvaluator<B: TextBackend> {
    backend: B,
}

impl<B: TextBackend> BackendEvaluator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn build_prompt(persona_summary: &str, transcripts: &[Transcript]) -> String {
        let transcript_json = serde_json::to_string_pretty(transcripts)
            .unwrap_or_else(|_| "[]".to_string());
        format!(
            "Persona:\n{persona_summary}\n\n\
             Transcript(s):\n{transcript_json}\n\n\
             Score this persona's contributions on each of: engagement, \
             conversation_quality, diversity, persona_fidelity, safety. \
             Each value must be a number in [0, 1]. Respond with only a \
             JSON object with exactly those five keys."
        )
    }
}

#[async_trait]
impl<B: TextBackend> Evaluator for BackendEvaluator<B> {
    async fn evaluate(
        &self,
        name: &str,
        transcripts: &[Transcript],
        persona_summary: &str,
    ) -> FitnessScores {
        let prompt = Self::build_prompt(persona_summary, transcripts);

        let response = self
            .backend
            .generate(
                "You are an impartial judge. Respond with only a strict JSON object.",
                &prompt,
                GenerateOptions {
                    model_id: None,
                    temperature: Some(0.0),
                },
            )
            .await;

        match response {
            Ok(text) if !text.trim().is_empty() => {
                match serde_json::from_str::<JudgeResponse>(strip_code_fence(&text)) {
                    Ok(judged) => judged.into(),
                    Err(e) => {
                        warn!(persona = name, error = %e, "judge response failed to parse, degraded mode");
                        degraded_fallback()
                    }
                }
            }
            Ok(_) => {
                warn!(persona = name, "judge returned empty content, degraded mode");
                degraded_fallback()
            }
            Err(e) => {
                warn!(persona = name, error = %e, "judge call failed, degraded mode");
                degraded_fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_llm::ScriptedBackend;

    #[tokio::test]
    async fn parses_plain_json() {
        let backend = ScriptedBackend::new(
            r#"{"engagement":0.8,"conversation_quality":0.6,"diversity":0.4,"persona_fidelity":0.9,"safety":1.0}"#,
        );
        let evaluator = BackendEvaluator::new(backend);
        let scores = evaluator.evaluate("alice", &[], "a botanist").await;
        assert_eq!(scores.engagement, 0.8);
        assert_eq!(scores.safety, 1.0);
        assert!(scores.extra.is_empty());
    }

    #[tokio::test]
    async fn parses_fenced_json() {
        let backend = ScriptedBackend::new(
            "```json\n{\"engagement\":0.5,\"conversation_quality\":0.5,\"diversity\":0.5,\"persona_fidelity\":0.5,\"safety\":0.5}\n```",
        );
        let evaluator = BackendEvaluator::new(backend);
        let scores = evaluator.evaluate("alice", &[], "a chef").await;
        assert_eq!(scores.engagement, 0.5);
    }

    #[tokio::test]
    async fn unparseable_response_is_degraded() {
        let backend = ScriptedBackend::new("not json at all");
        let evaluator = BackendEvaluator::new(backend);
        let scores = evaluator.evaluate("alice", &[], "a chef").await;
        assert_eq!(scores.engagement, 0.1);
        assert_eq!(scores.safety, 1.0);
        assert_eq!(scores.extra.get(DEGRADED_KEY), Some(&1.0));
    }

    #[tokio::test]
    async fn empty_response_is_degraded() {
        let backend = ScriptedBackend::new("");
        let evaluator = BackendEvaluator::new(backend);
        let scores = evaluator.evaluate("alice", &[], "a chef").await;
        assert_eq!(scores.extra.get(DEGRADED_KEY), Some(&1.0));
    }
}
