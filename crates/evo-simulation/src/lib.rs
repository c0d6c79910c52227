//! Topic-driven group episode protocol: all-agents-post, then a
//! shuffled engage/reply/pass loop over an episode-local feed.
//! Grounded on `beagle_agents::debate::DebateOrchestrator`'s
//! round-based loop and `beagle_agents::coordinator`'s staged
//! async orchestration, generalized from a fixed debate structure to
//! the spec's post-then-engage protocol.

mod agent;
mod episode;
mod feed;

pub use agent::SimulationAgent;
pub use episode::{run_episode, EpisodeOutcome};
pub use feed::{Feed, FeedEntry};
