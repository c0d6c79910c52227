use rand::seq::SliceRandom;
use rand::Rng;

use evo_genome::Individual;

/// Indices of the top `elite_count` individuals by `shared_fitness`,
/// ties broken by `raw_fitness` then by name (§4.7 step 8).
pub fn select_elites(population: &[Individual], elite_count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| {
        let ia = &population[a];
        let ib = &population[b];
        ib.shared_fitness
            .partial_cmp(&ia.shared_fitness)
            .unwrap()
            .then_with(|| ib.raw_fitness.partial_cmp(&ia.raw_fitness).unwrap())
            .then_with(|| ia.genotype.name.cmp(&ib.genotype.name))
    });
    order.truncate(elite_count.min(population.len()));
    order
}

/// Picks `tournament_size` individuals uniformly at random (with
/// replacement across separate calls) and returns the index of the one
/// with the highest `shared_fitness`.
pub fn tournament_select(
    population: &[Individual],
    tournament_size: usize,
    rng: &mut impl Rng,
) -> usize {
    let indices: Vec<usize> = (0..population.len()).collect();
    let contestants: Vec<usize> = indices
        .choose_multiple(rng, tournament_size.min(population.len()))
        .copied()
        .collect();

    *contestants
        .iter()
        .max_by(|&&a, &&b| {
            population[a]
                .shared_fitness
                .partial_cmp(&population[b].shared_fitness)
                .unwrap()
        })
        .expect("tournament must have at least one contestant")
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_genome::{compile, Genotype};

    fn individual(name: &str, shared: f64, raw: f64) -> Individual {
        let genotype = Genotype::new(name);
        let phenotype = compile(&genotype);
        let mut individual = Individual::new(genotype, phenotype);
        individual.shared_fitness = shared;
        individual.raw_fitness = raw;
        individual
    }

    #[test]
    fn elites_ordered_by_shared_fitness() {
        let population = vec![
            individual("a", 0.3, 0.3),
            individual("b", 0.9, 0.9),
            individual("c", 0.6, 0.6),
        ];
        let elites = select_elites(&population, 2);
        assert_eq!(elites, vec![1, 2]);
    }

    #[test]
    fn ties_broken_by_raw_then_name() {
        let population = vec![
            individual("zeta", 0.5, 0.5),
            individual("alpha", 0.5, 0.5),
        ];
        let elites = select_elites(&population, 1);
        assert_eq!(elites, vec![1]); // "alpha" < "zeta"
    }

    #[test]
    fn tournament_picks_best_of_sample() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        let population = vec![
            individual("a", 0.1, 0.1),
            individual("b", 0.9, 0.9),
            individual("c", 0.2, 0.2),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let winner = tournament_select(&population, 3, &mut rng);
        assert_eq!(winner, 1);
    }
}
