use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed-shape multi-objective score vector, each dimension in `[0, 1]`
/// (§3). Optional extension dimensions ride along in `extra` so a
/// judge prompt or a future evaluator can add `social_intelligence`,
/// `goal_achievement`, or `novelty` without a struct change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessScores {
    pub engagement: f64,
    pub conversation_quality: f64,
    pub diversity: f64,
    pub persona_fidelity: f64,
    pub safety: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, f64>,
}

impl FitnessScores {
    /// Looks a dimension up by name, checking the fixed fields first and
    /// falling back to `extra`. Used by weighted aggregation so the set
    /// of configured fitness weights is not hardcoded to the five
    /// baseline dimensions.
    pub fn get(&self, dimension: &str) -> Option<f64> {
        match dimension {
            "engagement" => Some(self.engagement),
            "conversation_quality" => Some(self.conversation_quality),
            "diversity" => Some(self.diversity),
            "persona_fidelity" => Some(self.persona_fidelity),
            "safety" => Some(self.safety),
            other => self.extra.get(other).copied(),
        }
    }
}

/// One event in a group episode's transcript (§3, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEvent {
    Post {
        author: String,
        content: String,
    },
    Reply {
        author: String,
        target_author: String,
        content: String,
        reply_to: String,
    },
    Pass {
        author: String,
        target_author: String,
    },
}

impl TranscriptEvent {
    pub fn author(&self) -> &str {
        match self {
            TranscriptEvent::Post { author, .. } => author,
            TranscriptEvent::Reply { author, .. } => author,
            TranscriptEvent::Pass { author, .. } => author,
        }
    }

    /// Text content contributed by this event, for diversity and
    /// conversation-quality scoring. `pass` events contribute nothing.
    pub fn content(&self) -> Option<&str> {
        match self {
            TranscriptEvent::Post { content, .. } => Some(content),
            TranscriptEvent::Reply { content, .. } => Some(content),
            TranscriptEvent::Pass { .. } => None,
        }
    }
}

/// Ordered sequence of events for one group episode.
pub type Transcript = Vec<TranscriptEvent>;

/// Per-individual record inside a generation's stats entry: the five
/// fitness dimensions plus the aggregated raw/shared fitness and the
/// judge-fallback flag (§6, §8 scenario 5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStats {
    pub name: String,
    pub engagement: f64,
    pub conversation_quality: f64,
    pub diversity: f64,
    pub persona_fidelity: f64,
    pub safety: f64,
    pub raw_fitness: f64,
    pub shared_fitness: f64,
    pub degraded: bool,
}

/// Aggregate statistics recorded once per generation in the append-only
/// stats log (§6): one JSON object per line, carrying an ISO-8601
/// timestamp, the generation-wide fitness summary, and a per-agent
/// breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStats {
    pub timestamp: String,
    pub generation: u64,
    pub population_size: usize,
    pub population_diversity: f64,
    pub fitness_mean: f64,
    pub fitness_max: f64,
    pub fitness_min: f64,
    #[serde(default)]
    pub degraded_events: u64,
    pub agents: Vec<AgentStats>,
}

impl GenerationStats {
    /// Stamps the current time as the record's `timestamp`, matching the
    /// ISO-8601 format the stats log contract requires.
    pub fn now_timestamp() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}
