//! Shared primitives for the persona-evolution workspace: the error
//! taxonomy crossing component boundaries and the seedable RNG handle
//! used instead of any thread-local or global generator.

mod error;
mod model;
mod rng;

pub use error::EvoError;
pub use model::{AgentStats, FitnessScores, GenerationStats, Transcript, TranscriptEvent};
pub use rng::{derive_seed, seeded};

pub type Result<T> = anyhow::Result<T>;
