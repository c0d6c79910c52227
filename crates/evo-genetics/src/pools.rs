use serde::{Deserialize, Serialize};

/// Curated static catalog of candidate attribute values used by the
/// structural mutator. Grounded on `beagle_personality::loader`'s
/// "load named buckets from a JSON/TOML document, warn and skip on
/// failure" idiom.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationPools {
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub core_values: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub communication_styles: Vec<String>,
    #[serde(default)]
    pub topical_focuses: Vec<String>,
    #[serde(default)]
    pub interaction_policies: Vec<String>,
    #[serde(default)]
    pub occupations: Vec<String>,
    #[serde(default)]
    pub life_events: Vec<String>,
    #[serde(default)]
    pub names: Vec<String>,
}

impl MutationPools {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// A small built-in catalog, used when no `mutation_pools` file is
    /// configured. Real runs are expected to supply their own.
    pub fn fallback() -> Self {
        Self {
            hobbies: vec!["gardening", "chess", "pottery", "running", "astronomy"]
                .into_iter()
                .map(String::from)
                .collect(),
            core_values: vec!["honesty", "curiosity", "loyalty", "ambition", "empathy"]
                .into_iter()
                .map(String::from)
                .collect(),
            goals: vec![
                "build a following",
                "share expertise",
                "connect with others",
                "debate ideas",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            communication_styles: vec!["blunt", "warm", "analytical", "playful"]
                .into_iter()
                .map(String::from)
                .collect(),
            topical_focuses: vec!["technology", "climate", "sports", "finance", "art"]
                .into_iter()
                .map(String::from)
                .collect(),
            interaction_policies: vec![
                "always reply with a question",
                "only reply to agreement",
                "challenge weak arguments",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            occupations: vec!["teacher", "engineer", "chef", "nurse", "musician"]
                .into_iter()
                .map(String::from)
                .collect(),
            life_events: vec![
                "Recently moved to a new city.",
                "Took up a new hobby after a long break.",
                "Reconnected with an old friend.",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            names: vec!["Rowan", "Sage", "Nico", "Juno", "Marlowe", "Tam"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
