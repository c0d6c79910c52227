use rand::seq::SliceRandom;
use rand::Rng;

use crate::pools::MutationPools;

/// Draws a name from the pool's `names` catalog that isn't already in
/// `taken`. Falls back to a numbered suffix if the whole pool is
/// exhausted, so callers always get a unique name back.
pub fn draw_unique_name(pools: &MutationPools, taken: &[String], rng: &mut impl Rng) -> String {
    let available: Vec<&String> = pools
        .names
        .iter()
        .filter(|n| !taken.iter().any(|t| t == *n))
        .collect();

    if let Some(name) = available.choose(rng) {
        return (*name).clone();
    }

    let mut n = 1;
    loop {
        let candidate = format!("Persona-{n}");
        if !taken.iter().any(|t| t == &candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn falls_back_when_pool_exhausted() {
        let pools = MutationPools {
            names: vec!["Only".to_string()],
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let name = draw_unique_name(&pools, &["Only".to_string()], &mut rng);
        assert_eq!(name, "Persona-1");
    }

    #[test]
    fn avoids_taken_names() {
        let pools = MutationPools {
            names: vec!["A".to_string(), "B".to_string()],
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let name = draw_unique_name(&pools, &["A".to_string()], &mut rng);
        assert_eq!(name, "B");
    }
}
