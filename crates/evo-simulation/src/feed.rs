/// One entry in an episode-local feed: a post or reply an engage
/// decision can target. Created empty at the start of each episode and
/// discarded at the end; episodes of distinct groups never share a feed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct Feed {
    entries: Vec<FeedEntry>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, author: impl Into<String>, content: impl Into<String>) {
        self.entries.push(FeedEntry {
            author: author.into(),
            content: content.into(),
        });
    }

    /// A feed entry uniformly chosen at random, excluding entries
    /// authored by `excluding`. `None` if no eligible entry exists.
    pub fn pick_excluding(&self, excluding: &str, rng: &mut impl rand::Rng) -> Option<&FeedEntry> {
        use rand::seq::SliceRandom;
        let eligible: Vec<&FeedEntry> = self
            .entries
            .iter()
            .filter(|e| e.author != excluding)
            .collect();
        eligible.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn excludes_own_entries() {
        let mut feed = Feed::new();
        feed.push("alice", "hello");
        let mut rng = StdRng::seed_from_u64(1);
        assert!(feed.pick_excluding("alice", &mut rng).is_none());
    }

    #[test]
    fn picks_from_others() {
        let mut feed = Feed::new();
        feed.push("alice", "hello");
        feed.push("bob", "hi there");
        let mut rng = StdRng::seed_from_u64(1);
        let picked = feed.pick_excluding("alice", &mut rng).unwrap();
        assert_eq!(picked.author, "bob");
    }
}
