use serde::{Deserialize, Serialize};

/// The rendered prompt pair the backend consumes during simulation.
/// Derived purely from a genotype by [`crate::compiler::compile`]; never
/// mutated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenotype {
    pub system_prompt: String,
    pub policy_instructions: String,
}
