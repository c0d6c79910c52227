use std::collections::BTreeSet;

use evo_genome::{AttributeValue, Genotype, KEY_AGE};

const MAX_AGE_SPAN: f64 = 62.0; // 80 - 18, the configured age range (§3).

/// Normalized genotype distance in `[0, 1]`, averaged per-field over the
/// union of attribute keys present in either genotype. Each field type
/// contributes its own normalized distance (§4.4):
///
/// - list of strings: `1 - Jaccard(a, b)`
/// - plain string: 0 if equal, 1 otherwise
/// - age (integer): `min(1, |a - b| / 62)`
/// - trait map: mean over the union of trait keys of `min(1, |va - vb|)`
/// - any other scalar: 0 if equal, 1 otherwise
///
/// Grounded on `beagle_agents::darwin_cycle::DarwinCycle::semantic_distance`'s
/// normalize-then-average shape, generalized from a single embedding
/// distance to one term per attribute.
pub fn genotype_distance(a: &Genotype, b: &Genotype) -> f64 {
    let keys: BTreeSet<&String> = a.attributes.keys().chain(b.attributes.keys()).collect();
    if keys.is_empty() {
        return 0.0;
    }

    let total: f64 = keys
        .iter()
        .map(|key| field_distance(key, a.get(key), b.get(key)))
        .sum();

    (total / keys.len() as f64).clamp(0.0, 1.0)
}

fn field_distance(key: &str, a: Option<&AttributeValue>, b: Option<&AttributeValue>) -> f64 {
    match (a, b) {
        (None, None) => 0.0,
        (Some(AttributeValue::List(a)), Some(AttributeValue::List(b))) => jaccard_distance(a, b),
        (Some(AttributeValue::List(a)), None) => jaccard_distance(a, &[]),
        (None, Some(AttributeValue::List(b))) => jaccard_distance(&[], b),
        (Some(AttributeValue::Traits(a)), Some(AttributeValue::Traits(b))) => trait_distance(a, b),
        (Some(AttributeValue::Traits(a)), None) => trait_distance(a, &Default::default()),
        (None, Some(AttributeValue::Traits(b))) => trait_distance(&Default::default(), b),
        (Some(AttributeValue::Int(a)), Some(AttributeValue::Int(b))) if key == KEY_AGE => {
            age_distance(*a, *b)
        }
        (Some(AttributeValue::Int(a)), None) if key == KEY_AGE => age_distance(*a, 0),
        (None, Some(AttributeValue::Int(b))) if key == KEY_AGE => age_distance(0, *b),
        (Some(av), Some(bv)) => scalar_distance(av, bv),
        _ => 1.0,
    }
}

fn jaccard_distance(a: &[String], b: &[String]) -> f64 {
    let set_a: BTreeSet<&String> = a.iter().collect();
    let set_b: BTreeSet<&String> = b.iter().collect();
    if set_a.is_empty() && set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        1.0 - (intersection as f64 / union as f64)
    }
}

fn trait_distance(
    a: &std::collections::BTreeMap<String, f64>,
    b: &std::collections::BTreeMap<String, f64>,
) -> f64 {
    let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    if keys.is_empty() {
        return 0.0;
    }
    let total: f64 = keys
        .iter()
        .map(|key| {
            let va = a.get(*key).copied().unwrap_or(0.0);
            let vb = b.get(*key).copied().unwrap_or(0.0);
            (va - vb).abs().min(1.0)
        })
        .sum();
    total / keys.len() as f64
}

fn age_distance(a: i64, b: i64) -> f64 {
    ((a - b).unsigned_abs() as f64 / MAX_AGE_SPAN).min(1.0)
}

fn scalar_distance(a: &AttributeValue, b: &AttributeValue) -> f64 {
    let equal = match (a, b) {
        (AttributeValue::Text(a), AttributeValue::Text(b)) => a == b,
        (AttributeValue::Int(a), AttributeValue::Int(b)) => a == b,
        (AttributeValue::Bool(a), AttributeValue::Bool(b)) => a == b,
        (AttributeValue::Float(a), AttributeValue::Float(b)) => a == b,
        _ => false,
    };
    if equal {
        0.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_genome::{KEY_COMMUNICATION_STYLE, KEY_HOBBIES, KEY_OCCUPATION, KEY_PERSONALITY_TRAITS};
    use std::collections::BTreeMap;

    #[test]
    fn identical_genotypes_have_zero_distance() {
        let mut g = Genotype::new("A");
        g.set(KEY_OCCUPATION, AttributeValue::Text("botanist".into()));
        g.set(KEY_AGE, AttributeValue::Int(40));
        assert_eq!(genotype_distance(&g, &g), 0.0);
    }

    #[test]
    fn differing_occupation_contributes_full_distance() {
        let mut a = Genotype::new("A");
        a.set(KEY_OCCUPATION, AttributeValue::Text("botanist".into()));
        let mut b = Genotype::new("B");
        b.set(KEY_OCCUPATION, AttributeValue::Text("chef".into()));
        assert_eq!(genotype_distance(&a, &b), 1.0);
    }

    #[test]
    fn disjoint_hobby_lists_give_distance_one() {
        let mut a = Genotype::new("A");
        a.set(KEY_HOBBIES, AttributeValue::List(vec!["chess".into()]));
        let mut b = Genotype::new("B");
        b.set(KEY_HOBBIES, AttributeValue::List(vec!["painting".into()]));
        assert_eq!(genotype_distance(&a, &b), 1.0);
    }

    #[test]
    fn age_distance_scales_with_span() {
        let mut a = Genotype::new("A");
        a.set(KEY_AGE, AttributeValue::Int(18));
        let mut b = Genotype::new("B");
        b.set(KEY_AGE, AttributeValue::Int(80));
        assert_eq!(genotype_distance(&a, &b), 1.0);
    }

    #[test]
    fn trait_distance_averages_over_union_of_keys() {
        let mut a = Genotype::new("A");
        let mut ta = BTreeMap::new();
        ta.insert("openness".to_string(), 0.2);
        a.set(KEY_PERSONALITY_TRAITS, AttributeValue::Traits(ta));

        let mut b = Genotype::new("B");
        let mut tb = BTreeMap::new();
        tb.insert("openness".to_string(), 0.8);
        tb.insert("neuroticism".to_string(), 0.5);
        b.set(KEY_PERSONALITY_TRAITS, AttributeValue::Traits(tb));

        let dist = genotype_distance(&a, &b);
        assert!(dist > 0.0 && dist < 1.0);
    }

    #[test]
    fn unrelated_keys_do_not_crash_scalar_path() {
        let mut a = Genotype::new("A");
        a.set(KEY_COMMUNICATION_STYLE, AttributeValue::Text("blunt".into()));
        let b = Genotype::new("B");
        assert_eq!(genotype_distance(&a, &b), 1.0);
    }
}
