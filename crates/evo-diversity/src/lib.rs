//! Diversity measures: embedding-based textual diversity and structural
//! genotype distance. Grounded on
//! `beagle_agents::darwin_cycle::{calculate_diversity, calculate_individual_diversity,
//! semantic_distance}`, generalized from a single embedding metric to a
//! per-field-type structural metric plus a separate textual metric.

mod structural;
mod textual;

pub use structural::genotype_distance;
pub use textual::{mean_embedding, population_diversity, textual_diversity};
