use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fitness-sharing (niching) parameters (§4.4, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NichingConfig {
    pub sigma: f64,
    pub alpha: f64,
}

impl Default for NichingConfig {
    fn default() -> Self {
        Self {
            sigma: 0.5,
            alpha: 1.0,
        }
    }
}

/// Generation-loop configuration (§4.7). All fields are required at
/// construction but each carries the spec's default, applied by
/// `EngineConfig::default()` or by `evo-config`'s loader when a field is
/// absent from the run's configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub population_size: usize,
    pub generations: usize,
    pub elite_count: usize,
    pub group_size: usize,
    pub reply_rounds: usize,
    pub mutation_rate: f64,
    pub fitness_weights: BTreeMap<String, f64>,
    pub niching: NichingConfig,
    pub tournament_size: usize,

    /// §9 Open Question 3: post-reproduction nickname generation is an
    /// optional hook, not an always-on step. Falls back to the
    /// pool-drawn name when disabled or when the backend call fails.
    #[serde(default)]
    pub nickname_hook_enabled: bool,

    /// §9's adopted resolution: every agent posts in Phase 1. Kept as a
    /// config surface (rather than hardcoded) so the alternative
    /// half-post variant the source material also described remains
    /// reachable without a code fork; only `true` is currently wired.
    #[serde(default = "default_true")]
    pub all_agents_post: bool,

    /// If the population does not divide evenly into `group_size`
    /// groups, merge the remainder into the last group instead of
    /// dropping it.
    #[serde(default)]
    pub merge_remainder_into_last_group: bool,

    /// Number of distinct trending topics requested per generation.
    #[serde(default = "default_topic_count")]
    pub topic_count: usize,
}

fn default_true() -> bool {
    true
}

fn default_topic_count() -> usize {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut fitness_weights = BTreeMap::new();
        fitness_weights.insert("engagement".to_string(), 0.35);
        fitness_weights.insert("conversation_quality".to_string(), 0.35);
        fitness_weights.insert("diversity".to_string(), 0.20);
        fitness_weights.insert("persona_fidelity".to_string(), 0.10);

        Self {
            population_size: 10,
            generations: 5,
            elite_count: 2,
            group_size: 4,
            reply_rounds: 3,
            mutation_rate: 0.2,
            fitness_weights,
            niching: NichingConfig::default(),
            tournament_size: 3,
            nickname_hook_enabled: false,
            all_agents_post: true,
            merge_remainder_into_last_group: false,
            topic_count: 5,
        }
    }
}

impl EngineConfig {
    /// `elite_count` defaults to `max(2, ceil(population_size / 4))`
    /// when not explicitly overridden by the caller (§4.7).
    pub fn default_elite_count(population_size: usize) -> usize {
        let quarter = (population_size + 3) / 4;
        quarter.max(2).min(population_size)
    }

    pub fn validate(&self) -> Result<(), evo_core::EvoError> {
        if self.elite_count > self.population_size {
            return Err(evo_core::EvoError::Config(
                "elite_count must not exceed population_size".into(),
            ));
        }
        if self.group_size == 0 || self.group_size > self.population_size {
            return Err(evo_core::EvoError::Config(
                "group_size must be nonzero and at most population_size".into(),
            ));
        }
        if self.fitness_weights.is_empty() {
            return Err(evo_core::EvoError::Config(
                "fitness_weights must not be empty".into(),
            ));
        }
        if self.fitness_weights.values().sum::<f64>() <= 0.0 {
            return Err(evo_core::EvoError::Config(
                "fitness_weights must not sum to zero".into(),
            ));
        }
        if self.niching.sigma <= 0.0 {
            return Err(evo_core::EvoError::Config(
                "niching.sigma must be positive".into(),
            ));
        }
        if self.niching.alpha <= 0.0 {
            return Err(evo_core::EvoError::Config(
                "niching.alpha must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_elite_count_is_at_least_two() {
        assert_eq!(EngineConfig::default_elite_count(4), 2);
        assert_eq!(EngineConfig::default_elite_count(10), 3);
        assert_eq!(EngineConfig::default_elite_count(20), 5);
    }

    #[test]
    fn rejects_elite_count_exceeding_population() {
        let mut cfg = EngineConfig::default();
        cfg.elite_count = cfg.population_size + 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_all_zero_fitness_weights() {
        let mut cfg = EngineConfig::default();
        for weight in cfg.fitness_weights.values_mut() {
            *weight = 0.0;
        }
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_nonpositive_niching_params() {
        let mut cfg = EngineConfig::default();
        cfg.niching.sigma = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.niching.alpha = -1.0;
        assert!(cfg.validate().is_err());
    }
}
