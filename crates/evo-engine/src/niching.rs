use evo_genome::Genotype;

use crate::config::NichingConfig;

/// Sharing function `sh(d) = 1 - (d/sigma)^alpha` for `d < sigma`, else 0
/// (§4.7 step 6).
fn sharing(distance: f64, config: &NichingConfig) -> f64 {
    if distance < config.sigma {
        1.0 - (distance / config.sigma).powf(config.alpha)
    } else {
        0.0
    }
}

/// Niche count and shared fitness for every individual in `population`,
/// in the same order. `d(i, i) = 0` so `sh(0) = 1`, giving every niche
/// count at least 1 — `shared_fitness = raw / max(n, 1)` therefore never
/// divides by zero.
pub fn apply_niching(population: &[Genotype], raw_fitness: &[f64], config: &NichingConfig) -> Vec<f64> {
    assert_eq!(population.len(), raw_fitness.len());

    (0..population.len())
        .map(|i| {
            let niche_count: f64 = population
                .iter()
                .map(|other| sharing(evo_diversity::genotype_distance(&population[i], other), config))
                .sum();
            raw_fitness[i] / niche_count.max(1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_genome::AttributeValue;

    fn genotype(name: &str, occupation: &str) -> Genotype {
        let mut g = Genotype::new(name);
        g.set(evo_genome::KEY_OCCUPATION, AttributeValue::Text(occupation.into()));
        g
    }

    #[test]
    fn identical_genotypes_share_fitness_heavily() {
        let population = vec![genotype("a", "chef"), genotype("b", "chef")];
        let raw = vec![1.0, 1.0];
        let config = NichingConfig::default();
        let shared = apply_niching(&population, &raw, &config);
        // distance 0 between identical genotypes => full sharing penalty.
        assert!(shared[0] < 1.0);
        assert!(shared[0] <= shared.iter().cloned().fold(0.0, f64::max));
    }

    #[test]
    fn distant_genotypes_keep_full_fitness() {
        let population = vec![genotype("a", "chef"), genotype("b", "botanist")];
        let raw = vec![0.8, 0.6];
        let config = NichingConfig { sigma: 0.1, alpha: 1.0 };
        let shared = apply_niching(&population, &raw, &config);
        assert!((shared[0] - 0.8).abs() < 1e-9);
        assert!((shared[1] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn shared_fitness_never_exceeds_raw() {
        let population = vec![genotype("a", "chef"), genotype("b", "chef"), genotype("c", "chef")];
        let raw = vec![0.9, 0.9, 0.9];
        let config = NichingConfig::default();
        let shared = apply_niching(&population, &raw, &config);
        for (s, r) in shared.iter().zip(raw.iter()) {
            assert!(s <= r);
        }
    }
}
