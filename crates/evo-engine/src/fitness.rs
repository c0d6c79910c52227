use std::collections::BTreeMap;

use evo_core::FitnessScores;

/// Weighted sum of the configured fitness dimensions (§4.7 step 5).
/// Dimensions named in `weights` that are missing from `scores` (the
/// optional extensions `social_intelligence`, `goal_achievement`,
/// `novelty`) are treated as 0 and the weights are renormalized over the
/// dimensions actually present, per §9 Open Question 2.
pub fn aggregate_raw_fitness(scores: &FitnessScores, weights: &BTreeMap<String, f64>) -> f64 {
    let present_weight: f64 = weights
        .iter()
        .filter(|(dim, _)| scores.get(dim).is_some())
        .map(|(_, w)| w)
        .sum();

    if present_weight <= 0.0 {
        return 0.0;
    }

    let sum: f64 = weights
        .iter()
        .map(|(dim, w)| {
            let value = scores.get(dim).unwrap_or(0.0);
            value * w
        })
        .sum();

    (sum / present_weight).clamp(0.0, 1.0)
}

/// Normalizes a fitness-weight map to sum to 1, per §3's invariant.
/// A no-op if the map already sums to (approximately) 1.
pub fn normalize_weights(weights: &mut BTreeMap<String, f64>) {
    let total: f64 = weights.values().sum();
    if total <= 0.0 || (total - 1.0).abs() < 1e-9 {
        return;
    }
    for w in weights.values_mut() {
        *w /= total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> FitnessScores {
        FitnessScores {
            engagement: 0.8,
            conversation_quality: 0.6,
            diversity: 0.4,
            persona_fidelity: 0.2,
            safety: 1.0,
            extra: Default::default(),
        }
    }

    #[test]
    fn weighted_sum_matches_manual_computation() {
        let mut weights = BTreeMap::new();
        weights.insert("engagement".to_string(), 0.35);
        weights.insert("conversation_quality".to_string(), 0.35);
        weights.insert("diversity".to_string(), 0.20);
        weights.insert("persona_fidelity".to_string(), 0.10);

        let raw = aggregate_raw_fitness(&scores(), &weights);
        let expected = 0.8 * 0.35 + 0.6 * 0.35 + 0.4 * 0.20 + 0.2 * 0.10;
        assert!((raw - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_dimension_is_renormalized_away() {
        let mut weights = BTreeMap::new();
        weights.insert("engagement".to_string(), 0.5);
        weights.insert("novelty".to_string(), 0.5); // not present in scores

        let raw = aggregate_raw_fitness(&scores(), &weights);
        assert!((raw - 0.8).abs() < 1e-9);
    }

    #[test]
    fn normalize_weights_scales_to_one() {
        let mut weights = BTreeMap::new();
        weights.insert("a".to_string(), 2.0);
        weights.insert("b".to_string(), 2.0);
        normalize_weights(&mut weights);
        let total: f64 = weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
