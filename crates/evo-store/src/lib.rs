//! File-based persistence for evolutionary runs: per-generation
//! population and transcript files plus an append-only statistics log,
//! all guarded by advisory file locks. Grounded on
//! `beagle_memory::engine::MemoryEngine`'s facade shape and the
//! `fs2`-based locking convention from `other_examples`'
//! `danielmriley-aigent` manifest.

mod lock;
mod paths;
mod store;

pub use store::Store;
