//! Genotype/phenotype data model and the pure compiler that renders one
//! into the other. Grounded on `beagle-personality`'s `Profile` template
//! builder and `PersonalityTraits` trait-map idiom.

mod compiler;
mod genotype;
mod individual;
mod phenotype;

pub use compiler::compile;
pub use genotype::{humanize_key, AttributeValue, Genotype};
pub use genotype::{
    KEY_AGE, KEY_BACKSTORY, KEY_COMMUNICATION_STYLE, KEY_CORE_VALUES, KEY_GOALS, KEY_HOBBIES,
    KEY_INTERACTION_POLICY, KEY_OCCUPATION, KEY_PERSONALITY_TRAITS, KEY_TOPICAL_FOCUS,
};
pub use individual::{GenerationRecord, Individual};
pub use phenotype::Phenotype;
