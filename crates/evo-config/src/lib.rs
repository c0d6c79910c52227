//! Run configuration loading: engine settings, seed personas, and
//! mutation pools from JSON files, layered onto typed defaults. Grounded
//! on `beagle_config`'s "defaults, optionally overridden by a file"
//! loading shape, narrowed from env-var-first to file-first since this
//! system's configuration is a run artifact rather than a deployment
//! profile.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use evo_engine::{EngineConfig, NichingConfig};
use evo_genetics::MutationPools;
use evo_genome::Genotype;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

const KNOWN_KEYS: &[&str] = &[
    "population_size",
    "generations",
    "elite_count",
    "group_size",
    "reply_rounds",
    "mutation_rate",
    "fitness_weights",
    "niching",
    "tournament_size",
    "nickname_hook_enabled",
    "all_agents_post",
    "merge_remainder_into_last_group",
    "topic_count",
];

#[derive(Debug, Default, Deserialize)]
struct EngineConfigOverrides {
    population_size: Option<usize>,
    generations: Option<usize>,
    elite_count: Option<usize>,
    group_size: Option<usize>,
    reply_rounds: Option<usize>,
    mutation_rate: Option<f64>,
    fitness_weights: Option<BTreeMap<String, f64>>,
    niching: Option<NichingConfig>,
    tournament_size: Option<usize>,
    nickname_hook_enabled: Option<bool>,
    all_agents_post: Option<bool>,
    merge_remainder_into_last_group: Option<bool>,
    topic_count: Option<usize>,
}

/// Loads `EngineConfig` from an optional JSON file, layered onto
/// `EngineConfig::default()`. Unknown top-level keys are logged and
/// ignored rather than rejected, so a config file written against a
/// newer or older schema still loads. `elite_count` is recomputed from
/// `default_elite_count` when the file overrides `population_size` but
/// not `elite_count` itself. Fitness weights are renormalized to sum to
/// 1 after any override.
pub fn load_engine_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let mut config = EngineConfig::default();

    if let Some(path) = path {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading engine config {}", path.display()))?;
        let raw: Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing engine config {}", path.display()))?;
        warn_unknown_keys(&raw);

        let overrides: EngineConfigOverrides = serde_json::from_value(raw)
            .with_context(|| format!("deserializing engine config {}", path.display()))?;
        apply_overrides(&mut config, overrides);
    }

    evo_engine::normalize_weights(&mut config.fitness_weights);
    config.validate()?;
    Ok(config)
}

fn warn_unknown_keys(raw: &Value) {
    let Some(obj) = raw.as_object() else {
        return;
    };
    for key in obj.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!(key = %key, "unknown engine configuration key, ignoring");
        }
    }
}

fn apply_overrides(config: &mut EngineConfig, overrides: EngineConfigOverrides) {
    let population_overridden = overrides.population_size.is_some();

    if let Some(v) = overrides.population_size {
        config.population_size = v;
    }
    if let Some(v) = overrides.generations {
        config.generations = v;
    }
    match overrides.elite_count {
        Some(v) => config.elite_count = v,
        None if population_overridden => {
            config.elite_count = EngineConfig::default_elite_count(config.population_size);
        }
        None => {}
    }
    if let Some(v) = overrides.group_size {
        config.group_size = v;
    }
    if let Some(v) = overrides.reply_rounds {
        config.reply_rounds = v;
    }
    if let Some(v) = overrides.mutation_rate {
        config.mutation_rate = v;
    }
    if let Some(v) = overrides.fitness_weights {
        config.fitness_weights = v;
    }
    if let Some(v) = overrides.niching {
        config.niching = v;
    }
    if let Some(v) = overrides.tournament_size {
        config.tournament_size = v;
    }
    if let Some(v) = overrides.nickname_hook_enabled {
        config.nickname_hook_enabled = v;
    }
    if let Some(v) = overrides.all_agents_post {
        config.all_agents_post = v;
    }
    if let Some(v) = overrides.merge_remainder_into_last_group {
        config.merge_remainder_into_last_group = v;
    }
    if let Some(v) = overrides.topic_count {
        config.topic_count = v;
    }
}

/// Loads the seed persona genotypes a run starts from, validating each
/// one (non-empty name, age within bounds if present) before handing
/// them back.
pub fn load_seed_personas(path: &Path) -> anyhow::Result<Vec<Genotype>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading seed personas {}", path.display()))?;
    let genotypes: Vec<Genotype> = serde_json::from_str(&text)
        .with_context(|| format!("parsing seed personas {}", path.display()))?;

    for genotype in &genotypes {
        genotype
            .validate()
            .with_context(|| format!("seed persona {:?} failed validation", genotype.name))?;
    }

    Ok(genotypes)
}

/// Loads the structural mutator's value catalog from an optional JSON
/// file, falling back to the small built-in catalog when none is
/// configured.
pub fn load_mutation_pools(path: Option<&Path>) -> anyhow::Result<MutationPools> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading mutation pools {}", path.display()))?;
            MutationPools::from_json(&text)
                .with_context(|| format!("parsing mutation pools {}", path.display()))
        }
        None => Ok(MutationPools::fallback()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_path_given() {
        let config = load_engine_config(None).unwrap();
        assert_eq!(config.population_size, EngineConfig::default().population_size);
    }

    #[test]
    fn population_override_recomputes_elite_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"population_size": 20}"#).unwrap();

        let config = load_engine_config(Some(&path)).unwrap();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.elite_count, EngineConfig::default_elite_count(20));
    }

    #[test]
    fn explicit_elite_count_is_not_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"population_size": 20, "elite_count": 1}"#).unwrap();

        let config = load_engine_config(Some(&path)).unwrap();
        assert_eq!(config.elite_count, 1);
    }

    #[test]
    fn unknown_key_does_not_fail_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"population_size": 8, "made_up_field": true}"#).unwrap();

        let config = load_engine_config(Some(&path)).unwrap();
        assert_eq!(config.population_size, 8);
    }

    #[test]
    fn fitness_weights_are_renormalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"fitness_weights": {"engagement": 2.0, "safety": 2.0}}"#).unwrap();

        let config = load_engine_config(Some(&path)).unwrap();
        let total: f64 = config.fitness_weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn seed_personas_reject_invalid_age() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.json");
        fs::write(
            &path,
            r#"[{"name": "alice", "attributes": {"age": 5}}]"#,
        )
        .unwrap();

        assert!(load_seed_personas(&path).is_err());
    }

    #[test]
    fn mutation_pools_fall_back_without_path() {
        let pools = load_mutation_pools(None).unwrap();
        assert!(!pools.names.is_empty());
    }
}
