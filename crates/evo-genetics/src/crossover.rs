use rand::Rng;

use evo_genome::{
    Genotype, KEY_AGE, KEY_BACKSTORY, KEY_COMMUNICATION_STYLE, KEY_CORE_VALUES, KEY_GOALS,
    KEY_HOBBIES, KEY_INTERACTION_POLICY, KEY_OCCUPATION, KEY_PERSONALITY_TRAITS, KEY_TOPICAL_FOCUS,
};

use crate::names::draw_unique_name;
use crate::pools::MutationPools;

const ALWAYS_FROM_A: &[&str] = &[
    KEY_OCCUPATION,
    KEY_CORE_VALUES,
    KEY_PERSONALITY_TRAITS,
    KEY_TOPICAL_FOCUS,
];

const ALWAYS_FROM_B: &[&str] = &[
    KEY_BACKSTORY,
    KEY_HOBBIES,
    KEY_COMMUNICATION_STYLE,
    KEY_INTERACTION_POLICY,
];

/// Pure, deterministic-given-a-random-source field-by-field crossover
/// (§4.3). Never touches the backend. Grounded on
/// `beagle_agents::darwin_cycle::DarwinCycle::crossover`'s per-field gene
/// mixing, generalized from the teacher's fixed structure/style/domain
/// genes to the spec's open attribute bag.
pub fn crossover(a: &Genotype, b: &Genotype, pools: &MutationPools, rng: &mut impl Rng) -> Genotype {
    let name = draw_unique_name(pools, &[a.name.clone(), b.name.clone()], rng);
    let mut child = Genotype::new(name);

    if let Some(age) = if rng.gen_bool(0.5) {
        a.get(KEY_AGE).cloned()
    } else {
        b.get(KEY_AGE).cloned()
    } {
        child.set(KEY_AGE, age);
    }

    for key in ALWAYS_FROM_A {
        if let Some(value) = a.get(key) {
            child.set(*key, value.clone());
        }
    }
    for key in ALWAYS_FROM_B {
        if let Some(value) = b.get(key) {
            child.set(*key, value.clone());
        }
    }

    if let Some(goals) = mix_goals(a, b) {
        child.set(KEY_GOALS, goals);
    }

    let handled: Vec<&str> = ALWAYS_FROM_A
        .iter()
        .chain(ALWAYS_FROM_B.iter())
        .chain([&KEY_AGE, &KEY_GOALS])
        .copied()
        .collect();

    for (key, value) in &a.attributes {
        if handled.contains(&key.as_str()) {
            continue;
        }
        // Present in A only, or present in both: A's value wins either way.
        child.set(key.clone(), value.clone());
    }
    for (key, value) in &b.attributes {
        if handled.contains(&key.as_str()) || a.attributes.contains_key(key) {
            continue;
        }
        // Present in B only.
        child.set(key.clone(), value.clone());
    }

    child
}

fn mix_goals(a: &Genotype, b: &Genotype) -> Option<evo_genome::AttributeValue> {
    let a_goals = a.get(KEY_GOALS).and_then(evo_genome::AttributeValue::as_list)?;
    let b_goals = b.get(KEY_GOALS).and_then(evo_genome::AttributeValue::as_list)?;

    let first_half_len = (a_goals.len() + 1) / 2; // ceiling(|A|/2)
    let mut mixed: Vec<String> = a_goals.iter().take(first_half_len).cloned().collect();

    let b_second_half_start = b_goals.len() / 2;
    mixed.extend(b_goals.iter().skip(b_second_half_start).cloned());

    Some(evo_genome::AttributeValue::List(mixed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_genome::AttributeValue;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn parent(name: &str, occupation: &str) -> Genotype {
        let mut g = Genotype::new(name);
        g.set(KEY_OCCUPATION, AttributeValue::Text(occupation.into()));
        g.set(KEY_AGE, AttributeValue::Int(30));
        g.set(
            KEY_HOBBIES,
            AttributeValue::List(vec!["reading".into()]),
        );
        let mut traits = BTreeMap::new();
        traits.insert("openness".to_string(), 0.5);
        g.set(KEY_PERSONALITY_TRAITS, AttributeValue::Traits(traits));
        g
    }

    #[test]
    fn occupation_always_from_a() {
        let a = parent("A", "botanist");
        let b = parent("B", "chef");
        let pools = MutationPools::fallback();
        let mut rng = StdRng::seed_from_u64(7);
        let child = crossover(&a, &b, &pools, &mut rng);
        assert_eq!(
            child.get(KEY_OCCUPATION).and_then(AttributeValue::as_text),
            Some("botanist")
        );
    }

    #[test]
    fn hobbies_always_from_b() {
        let mut a = parent("A", "botanist");
        a.set(KEY_HOBBIES, AttributeValue::List(vec!["chess".into()]));
        let b = parent("B", "chef");
        let pools = MutationPools::fallback();
        let mut rng = StdRng::seed_from_u64(7);
        let child = crossover(&a, &b, &pools, &mut rng);
        assert_eq!(
            child.get(KEY_HOBBIES).and_then(AttributeValue::as_list),
            Some(&["reading".to_string()][..])
        );
    }

    #[test]
    fn goals_mix_halves() {
        let mut a = parent("A", "botanist");
        a.set(
            KEY_GOALS,
            AttributeValue::List(vec!["g1".into(), "g2".into(), "g3".into()]),
        );
        let mut b = parent("B", "chef");
        b.set(
            KEY_GOALS,
            AttributeValue::List(vec!["h1".into(), "h2".into(), "h3".into(), "h4".into()]),
        );
        let pools = MutationPools::fallback();
        let mut rng = StdRng::seed_from_u64(7);
        let child = crossover(&a, &b, &pools, &mut rng);
        let goals = child.get(KEY_GOALS).and_then(AttributeValue::as_list).unwrap();
        // ceil(3/2) = 2 from A, then second half of B's 4 (skip first 2).
        assert_eq!(goals, &["g1", "g2", "h3", "h4"]);
    }

    #[test]
    fn unknown_attribute_present_in_both_keeps_a() {
        let mut a = parent("A", "botanist");
        let mut b = parent("B", "chef");
        a.set("catchphrase", AttributeValue::Text("from A".into()));
        b.set("catchphrase", AttributeValue::Text("from B".into()));
        let pools = MutationPools::fallback();
        let mut rng = StdRng::seed_from_u64(3);
        let child = crossover(&a, &b, &pools, &mut rng);
        assert_eq!(
            child.get("catchphrase").and_then(AttributeValue::as_text),
            Some("from A")
        );
    }

    #[test]
    fn child_name_is_unique() {
        let a = parent("A", "botanist");
        let b = parent("B", "chef");
        let pools = MutationPools::fallback();
        let mut rng = StdRng::seed_from_u64(1);
        let child = crossover(&a, &b, &pools, &mut rng);
        assert_ne!(child.name, "A");
        assert_ne!(child.name, "B");
    }
}
