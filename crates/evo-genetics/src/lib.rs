//! Genetic operators: pool-based and backend-driven mutation, field-mixing
//! crossover. Grounded on `beagle_agents::darwin_cycle`'s reproduction
//! step, generalized from fixed structure/style/domain genes to the
//! open persona attribute bag.

mod crossover;
mod mutate;
mod names;
mod pools;

pub use crossover::crossover;
pub use mutate::{nickname_hook, BackendMutator, Mutator, PoolMutator};
pub use names::draw_unique_name;
pub use pools::MutationPools;
