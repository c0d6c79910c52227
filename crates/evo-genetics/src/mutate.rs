use std::collections::BTreeMap;

use async_trait::async_trait;
use evo_genome::{
    AttributeValue, Genotype, KEY_AGE, KEY_BACKSTORY, KEY_COMMUNICATION_STYLE, KEY_CORE_VALUES,
    KEY_GOALS, KEY_HOBBIES, KEY_PERSONALITY_TRAITS, KEY_TOPICAL_FOCUS,
};
use evo_llm::{GenerateOptions, TextBackend};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::pools::MutationPools;

/// Single-method capability for "take a genotype, return a mutated copy",
/// so the engine can hold a `Box<dyn Mutator>` chosen once at
/// construction from configuration (pool vs. backend), per the
/// single-method-interface guidance for operator polymorphism.
#[async_trait]
pub trait Mutator: Send + Sync {
    async fn mutate(&self, genotype: &Genotype, rng: &mut dyn rand::RngCore) -> Genotype;
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    TraitPerturb,
    ListSwap,
    StyleReplace,
    AgeShift,
    BackstoryEvent,
}

const STRATEGIES: [Strategy; 5] = [
    Strategy::TraitPerturb,
    Strategy::ListSwap,
    Strategy::StyleReplace,
    Strategy::AgeShift,
    Strategy::BackstoryEvent,
];

/// Structural mutator over the static value catalog (§4.2). Picks 1 or 2
/// strategies uniformly at random per call and applies them in order to a
/// copy of the genotype. Grounded on
/// `beagle_agents::darwin_cycle::DarwinCycle::mutate`'s
/// strategy-indexed-match shape.
pub struct PoolMutator {
    pools: MutationPools,
}

impl PoolMutator {
    pub fn new(pools: MutationPools) -> Self {
        Self { pools }
    }

    fn apply_strategy(&self, genotype: &mut Genotype, strategy: Strategy, rng: &mut dyn rand::RngCore) {
        match strategy {
            Strategy::TraitPerturb => self.trait_perturb(genotype, rng),
            Strategy::ListSwap => self.list_swap(genotype, rng),
            Strategy::StyleReplace => self.style_replace(genotype, rng),
            Strategy::AgeShift => self.age_shift(genotype, rng),
            Strategy::BackstoryEvent => self.backstory_event(genotype, rng),
        }
    }

    fn trait_perturb(&self, genotype: &mut Genotype, rng: &mut dyn rand::RngCore) {
        let Some(traits) = genotype
            .get(KEY_PERSONALITY_TRAITS)
            .and_then(AttributeValue::as_traits)
            .cloned()
        else {
            return;
        };
        if traits.is_empty() {
            return;
        }
        let keys: Vec<&String> = traits.keys().collect();
        let idx = rng.gen_range(0..keys.len());
        let key = keys[idx].clone();

        let mut updated: BTreeMap<String, f64> = traits;
        let delta = rng.gen_range(-0.15..=0.15);
        let current = updated[&key];
        updated.insert(key, (current + delta).clamp(0.0, 1.0));

        genotype.set(KEY_PERSONALITY_TRAITS, AttributeValue::Traits(updated));
    }

    fn list_swap(&self, genotype: &mut Genotype, rng: &mut dyn rand::RngCore) {
        let candidates = [
            (KEY_HOBBIES, &self.pools.hobbies),
            (KEY_CORE_VALUES, &self.pools.core_values),
            (KEY_GOALS, &self.pools.goals),
        ];
        let Some((key, pool)) = candidates.choose(rng) else {
            return;
        };
        if pool.is_empty() {
            return;
        }
        let Some(mut current) = genotype.get(key).and_then(AttributeValue::as_list).map(|s| s.to_vec()) else {
            return;
        };
        if !current.is_empty() {
            let remove_idx = rng.gen_range(0..current.len());
            current.remove(remove_idx);
        }
        let available: Vec<&String> = pool.iter().filter(|v| !current.contains(v)).collect();
        if let Some(addition) = available.choose(rng) {
            current.push((*addition).clone());
        }
        genotype.set(*key, AttributeValue::List(current));
    }

    fn style_replace(&self, genotype: &mut Genotype, rng: &mut dyn rand::RngCore) {
        let candidates = [
            (KEY_COMMUNICATION_STYLE, &self.pools.communication_styles),
            (KEY_TOPICAL_FOCUS, &self.pools.topical_focuses),
        ];
        let Some((key, pool)) = candidates.choose(rng) else {
            return;
        };
        let current = genotype.get(key).and_then(AttributeValue::as_text).map(str::to_string);
        let available: Vec<&String> = pool
            .iter()
            .filter(|v| Some(v.as_str()) != current.as_deref())
            .collect();
        if let Some(replacement) = available.choose(rng) {
            genotype.set(*key, AttributeValue::Text((*replacement).clone()));
        }
    }

    fn age_shift(&self, genotype: &mut Genotype, rng: &mut dyn rand::RngCore) {
        let Some(age) = genotype.get(KEY_AGE).and_then(AttributeValue::as_int) else {
            return;
        };
        let delta = rng.gen_range(-5..=5);
        let delta = if delta == 0 { 1 } else { delta };
        let shifted = (age + delta as i64).clamp(18, 80);
        genotype.set(KEY_AGE, AttributeValue::Int(shifted));
    }

    fn backstory_event(&self, genotype: &mut Genotype, rng: &mut dyn rand::RngCore) {
        if self.pools.life_events.is_empty() {
            return;
        }
        let event = self.pools.life_events.choose(rng).unwrap();
        let mut backstory = genotype
            .get(KEY_BACKSTORY)
            .and_then(AttributeValue::as_text)
            .unwrap_or("")
            .to_string();
        if !backstory.is_empty() {
            backstory.push(' ');
        }
        backstory.push_str(event);
        genotype.set(KEY_BACKSTORY, AttributeValue::Text(backstory));
    }
}

#[async_trait]
impl Mutator for PoolMutator {
    async fn mutate(&self, genotype: &Genotype, rng: &mut dyn rand::RngCore) -> Genotype {
        let mut child = genotype.clone();

        let strategy_count = if rng.gen_bool(0.5) { 1 } else { 2 };
        let chosen: Vec<Strategy> = STRATEGIES
            .choose_multiple(rng, strategy_count)
            .copied()
            .collect();

        for strategy in chosen {
            self.apply_strategy(&mut child, strategy, rng);
        }

        child
    }
}

/// Asks the backend for "a slightly different variation with a fresh
/// unique name" and parses the response as a genotype. Fails open to the
/// pool mutator on any parse failure, empty result, or transport error —
/// never propagates past its own boundary, per §4.2.
pub struct BackendMutator<B: TextBackend> {
    backend: B,
    fallback: PoolMutator,
}

impl<B: TextBackend> BackendMutator<B> {
    pub fn new(backend: B, pools: MutationPools) -> Self {
        Self {
            backend,
            fallback: PoolMutator::new(pools),
        }
    }
}

#[async_trait]
impl<B: TextBackend> Mutator for BackendMutator<B> {
    async fn mutate(&self, genotype: &Genotype, rng: &mut dyn rand::RngCore) -> Genotype {
        let serialized = match serde_json::to_string(genotype) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to serialize genotype for backend mutator, falling back");
                return self.fallback.mutate(genotype, rng).await;
            }
        };

        let prompt = format!(
            "Here is a persona definition as JSON:\n{serialized}\n\n\
             Produce a slightly different variation with a fresh unique name. \
             Respond with only the JSON object."
        );

        let response = self
            .backend
            .generate(
                "You generate persona variations as strict JSON.",
                &prompt,
                GenerateOptions::default(),
            )
            .await;

        match response {
            Ok(text) if !text.trim().is_empty() => match serde_json::from_str::<Genotype>(&text) {
                Ok(child) => child,
                Err(e) => {
                    warn!(error = %e, "backend mutator returned unparseable genotype, falling back");
                    self.fallback.mutate(genotype, rng).await
                }
            },
            Ok(_) => {
                warn!("backend mutator returned empty content, falling back");
                self.fallback.mutate(genotype, rng).await
            }
            Err(e) => {
                warn!(error = %e, "backend mutator call failed, falling back");
                self.fallback.mutate(genotype, rng).await
            }
        }
    }
}

/// Draws a post-reproduction nickname, falling back to the pool-drawn name
/// on failure or when disabled. Implements the Open Question 3 decision:
/// an optional post-reproduction hook, not an always-on step.
pub async fn nickname_hook<B: TextBackend + ?Sized>(
    backend: Option<&B>,
    pool_drawn_name: &str,
    taken: &[String],
) -> String {
    let Some(backend) = backend else {
        return pool_drawn_name.to_string();
    };

    let prompt = format!(
        "Suggest one short, unique first name, different from: {}. Respond with only the name.",
        taken.join(", ")
    );

    match backend
        .generate("You suggest short unique names.", &prompt, GenerateOptions::default())
        .await
    {
        Ok(name) if !name.trim().is_empty() && !taken.iter().any(|t| t == name.trim()) => {
            name.trim().to_string()
        }
        _ => pool_drawn_name.to_string(),
    }
}
