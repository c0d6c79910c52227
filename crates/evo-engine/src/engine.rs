use std::sync::Arc;

use evo_core::{derive_seed, seeded, EvoError, GenerationStats};
use evo_genetics::{crossover, draw_unique_name, nickname_hook, MutationPools, Mutator};
use evo_genome::{compile, GenerationRecord, Genotype, Individual};
use evo_llm::{EmbeddingBackend, TextBackend};
use evo_simulation::{run_episode, SimulationAgent};
use evo_store::Store;
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::config::EngineConfig;
use crate::fitness::aggregate_raw_fitness;
use crate::groups::assemble_groups;
use crate::niching::apply_niching;
use crate::selection::{select_elites, tournament_select};
use crate::topics::produce_topics;
use evo_evaluator::Evaluator;

/// Orchestrates the full evolutionary run (§4.7): population init,
/// per-generation group assembly, simulation fan-out, evaluation
/// fan-out, niching, persistence, and reproduction. Grounded on
/// `beagle_agents::darwin_cycle::DarwinCycle`, generalized from a
/// single-text genome with a flat diversity bonus to full persona
/// genotypes with a proper fitness-sharing niche count, and from a
/// monolithic `evolve` loop to the spec's explicit nine-step contract.
pub struct EvolutionEngine {
    config: EngineConfig,
    backend: Arc<dyn TextBackend>,
    embedder: Arc<dyn EmbeddingBackend>,
    mutator: Arc<dyn Mutator>,
    evaluator: Arc<dyn Evaluator>,
    pools: MutationPools,
    store: Store,
    base_seed: u64,
}

impl EvolutionEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: EngineConfig,
        backend: Arc<dyn TextBackend>,
        embedder: Arc<dyn EmbeddingBackend>,
        mutator: Arc<dyn Mutator>,
        evaluator: Arc<dyn Evaluator>,
        pools: MutationPools,
        store: Store,
        base_seed: u64,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            backend,
            embedder,
            mutator,
            evaluator,
            pools,
            store,
            base_seed,
        })
    }

    /// Runs the engine to completion: `generations` generations unless
    /// resuming past the last configured one, in which case it exits
    /// cleanly without doing any work (§4.7 resume semantics).
    #[instrument(skip(self, seeds))]
    pub async fn run(&self, seeds: Vec<Genotype>) -> anyhow::Result<()> {
        let existing = self.store.list_generations()?;
        let (mut population, start_gen) = if let Some(&last) = existing.last() {
            if last >= self.config.generations.saturating_sub(1) as u64 {
                info!(last, "resume target already reached, exiting cleanly");
                return Ok(());
            }
            let genotypes = self.store.load_generation(last)?;
            (self.materialize(genotypes), (last + 1) as usize)
        } else {
            let gen_seed = derive_seed(self.base_seed, 0);
            let mut rng = seeded(gen_seed);
            (self.initialize_population(seeds, &mut rng), 0)
        };

        for generation_id in start_gen..self.config.generations {
            population = self.run_generation(generation_id as u64, population).await?;
        }

        Ok(())
    }

    fn materialize(&self, genotypes: Vec<Genotype>) -> Vec<Individual> {
        genotypes
            .into_iter()
            .map(|g| {
                let phenotype = compile(&g);
                Individual::new(g, phenotype)
            })
            .collect()
    }

    fn initialize_population(&self, seeds: Vec<Genotype>, rng: &mut impl Rng) -> Vec<Individual> {
        use rand::seq::SliceRandom;

        let mut genotypes = seeds;
        genotypes.truncate(self.config.population_size);

        let mut names: Vec<String> = genotypes.iter().map(|g| g.name.clone()).collect();
        while genotypes.len() < self.config.population_size {
            let Some(seed) = genotypes.choose(rng) else {
                break;
            };
            let mut child = seed.clone();
            child.name = draw_unique_name(&self.pools, &names, rng);
            names.push(child.name.clone());
            genotypes.push(child);
        }

        self.materialize(genotypes)
    }

    async fn run_generation(
        &self,
        generation_id: u64,
        mut population: Vec<Individual>,
    ) -> anyhow::Result<Vec<Individual>> {
        info!(generation_id, population = population.len(), "starting generation");
        let gen_seed = derive_seed(self.base_seed, generation_id + 1);
        let mut rng = seeded(gen_seed);

        let topics = produce_topics(self.backend.as_ref(), self.config.topic_count).await;
        let groups = assemble_groups(
            population.len(),
            self.config.group_size,
            self.config.merge_remainder_into_last_group,
            &mut rng,
        );

        let mut group_topics = Vec::with_capacity(groups.len());
        for _ in &groups {
            let idx = if topics.is_empty() { 0 } else { rng.gen_range(0..topics.len()) };
            group_topics.push(topics.get(idx).cloned().unwrap_or_default());
        }

        let (transcripts, membership, mut degraded_events) =
            self.run_episodes(&population, &groups, &group_topics, gen_seed).await;

        let scored = self
            .evaluate_individuals(&population, &transcripts, &membership)
            .await;

        let genotypes: Vec<Genotype> = population.iter().map(|i| i.genotype.clone()).collect();
        let raw_fitness: Vec<f64> = scored
            .iter()
            .map(|scores| aggregate_raw_fitness(scores, &self.config.fitness_weights))
            .collect();
        let shared_fitness = apply_niching(&genotypes, &raw_fitness, &self.config.niching);

        for (i, individual) in population.iter_mut().enumerate() {
            if scored[i].extra.contains_key(evo_evaluator::DEGRADED_KEY) {
                degraded_events += 1;
            }
            individual.scores = Some(scored[i].clone());
            individual.raw_fitness = raw_fitness[i];
            individual.shared_fitness = shared_fitness[i];
        }

        let population_diversity = crate::population_textual_diversity(&transcripts, self.embedder.as_ref()).await;

        let agents: Vec<evo_core::AgentStats> = population
            .iter()
            .enumerate()
            .map(|(i, individual)| {
                let scores = &scored[i];
                evo_core::AgentStats {
                    name: individual.genotype.name.clone(),
                    engagement: scores.engagement,
                    conversation_quality: scores.conversation_quality,
                    diversity: scores.diversity,
                    persona_fidelity: scores.persona_fidelity,
                    safety: scores.safety,
                    raw_fitness: raw_fitness[i],
                    shared_fitness: shared_fitness[i],
                    degraded: scores.extra.contains_key(evo_evaluator::DEGRADED_KEY),
                }
            })
            .collect();

        let stats = GenerationStats {
            timestamp: GenerationStats::now_timestamp(),
            generation: generation_id,
            population_size: population.len(),
            population_diversity,
            fitness_mean: mean(&shared_fitness),
            fitness_max: shared_fitness.iter().cloned().fold(0.0, f64::max),
            fitness_min: shared_fitness.iter().cloned().fold(f64::MAX, f64::min),
            degraded_events,
            agents,
        };

        let record = GenerationRecord {
            generation_id,
            individuals: population.clone(),
            transcripts,
            stats,
        };
        self.store
            .save_generation(&record)
            .map_err(|e| EvoError::StoreWrite(e.to_string()))?;

        if generation_id >= self.config.generations.saturating_sub(1) as u64 {
            return Ok(population);
        }

        self.reproduce(population, &mut rng).await
    }

    async fn run_episodes(
        &self,
        population: &[Individual],
        groups: &[Vec<usize>],
        group_topics: &[String],
        gen_seed: u64,
    ) -> (Vec<evo_core::Transcript>, Vec<Vec<usize>>, u64) {
        let mut set = tokio::task::JoinSet::new();

        for (group_idx, indices) in groups.iter().enumerate() {
            let agents: Vec<SimulationAgent> = indices
                .iter()
                .map(|&i| SimulationAgent::new(population[i].genotype.clone(), population[i].phenotype.clone()))
                .collect();
            let backend = self.backend.clone();
            let topic = group_topics[group_idx].clone();
            let rounds = self.config.reply_rounds;
            let seed = derive_seed(gen_seed, group_idx as u64);
            let indices = indices.clone();

            set.spawn(async move {
                let mut agents = agents;
                let mut rng = seeded(seed);
                let outcome = run_episode(&mut agents, &topic, rounds, backend.as_ref(), &mut rng).await;
                (indices, outcome)
            });
        }

        let mut transcripts = Vec::with_capacity(groups.len());
        let mut membership = vec![Vec::new(); population.len()];
        let mut degraded = 0u64;

        let mut results = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => warn!(error = %e, "group episode task panicked"),
            }
        }
        // Deterministic ordering: sort by the group's first member index.
        results.sort_by_key(|(indices, _)| indices.first().copied().unwrap_or(usize::MAX));

        for (indices, outcome) in results {
            degraded += outcome.degraded_events;
            let transcript_idx = transcripts.len();
            for &i in &indices {
                membership[i].push(transcript_idx);
            }
            transcripts.push(outcome.transcript);
        }

        (transcripts, membership, degraded)
    }

    async fn evaluate_individuals(
        &self,
        population: &[Individual],
        transcripts: &[evo_core::Transcript],
        membership: &[Vec<usize>],
    ) -> Vec<evo_core::FitnessScores> {
        let mut set = tokio::task::JoinSet::new();

        for (i, individual) in population.iter().enumerate() {
            let name = individual.genotype.name.clone();
            let persona_summary = individual.phenotype.system_prompt.clone();
            let own_transcripts: Vec<evo_core::Transcript> = membership[i]
                .iter()
                .map(|&t| transcripts[t].clone())
                .collect();
            let evaluator = self.evaluator.clone();

            set.spawn(async move {
                let scores = evaluator.evaluate(&name, &own_transcripts, &persona_summary).await;
                (i, scores)
            });
        }

        let mut scored: Vec<Option<evo_core::FitnessScores>> = vec![None; population.len()];
        while let Some(joined) = set.join_next().await {
            if let Ok((i, scores)) = joined {
                scored[i] = Some(scores);
            }
        }

        scored
            .into_iter()
            .map(|s| s.unwrap_or_else(degraded_zero_scores))
            .collect()
    }

    async fn reproduce(&self, population: Vec<Individual>, rng: &mut impl Rng) -> anyhow::Result<Vec<Individual>> {
        let elite_indices = select_elites(&population, self.config.elite_count);
        let mut next: Vec<Individual> = elite_indices.iter().map(|&i| population[i].clone()).collect();
        let mut names: Vec<String> = next.iter().map(|i| i.genotype.name.clone()).collect();

        while next.len() < self.config.population_size {
            let a = tournament_select(&population, self.config.tournament_size, rng);
            let b = tournament_select(&population, self.config.tournament_size, rng);

            let mut child = crossover(&population[a].genotype, &population[b].genotype, &self.pools, rng);

            if rng.gen_bool(self.config.mutation_rate) {
                child = self.mutator.mutate(&child, rng).await;
            }

            let pool_name = draw_unique_name(&self.pools, &names, rng);
            child.name = if self.config.nickname_hook_enabled {
                nickname_hook(Some(self.backend.as_ref()), &pool_name, &names).await
            } else {
                pool_name
            };
            if names.contains(&child.name) {
                child.name = draw_unique_name(&self.pools, &names, rng);
            }
            names.push(child.name.clone());

            let phenotype = compile(&child);
            next.push(Individual::new(child, phenotype));
        }

        Ok(next)
    }
}

fn degraded_zero_scores() -> evo_core::FitnessScores {
    let mut extra = std::collections::BTreeMap::new();
    extra.insert(evo_evaluator::DEGRADED_KEY.to_string(), 1.0);
    evo_core::FitnessScores {
        engagement: 0.0,
        conversation_quality: 0.0,
        diversity: 0.0,
        persona_fidelity: 0.0,
        safety: 1.0,
        extra,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
