use evo_core::{FitnessScores, GenerationStats, Transcript};
use serde::{Deserialize, Serialize};

use crate::{Genotype, Phenotype};

/// A scored member of a population (§3). Created at population
/// initialization or reproduction; scored during evaluation; consumed by
/// selection; serialized at the end of a generation; discarded after
/// reproduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub genotype: Genotype,
    pub phenotype: Phenotype,
    pub scores: Option<FitnessScores>,
    pub raw_fitness: f64,
    pub shared_fitness: f64,
}

impl Individual {
    pub fn new(genotype: Genotype, phenotype: Phenotype) -> Self {
        Self {
            genotype,
            phenotype,
            scores: None,
            raw_fitness: 0.0,
            shared_fitness: 0.0,
        }
    }
}

/// One fully materialized generation: the population, its transcripts,
/// and the statistics derived from them (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation_id: u64,
    pub individuals: Vec<Individual>,
    pub transcripts: Vec<Transcript>,
    pub stats: GenerationStats,
}
