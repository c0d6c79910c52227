use evo_llm::{with_backoff, GenerateOptions, TextBackend};
use tracing::warn;

/// Static fallback list shipped with the system, used when the backend
/// fails to produce distinct trending topics (§4.7 step 2).
pub const FALLBACK_TOPICS: [&str; 15] = [
    "remote work culture",
    "climate adaptation",
    "artificial intelligence ethics",
    "urban gardening",
    "personal finance habits",
    "space exploration",
    "mental health awareness",
    "local food movements",
    "electric vehicles",
    "online privacy",
    "creative side projects",
    "minimalist living",
    "generational differences",
    "civic engagement",
    "future of education",
];

/// Asks the backend for `count` distinct trending topics, one per line.
/// Falls back to a static catalog on transport failure, empty response,
/// or too few distinct lines.
pub async fn produce_topics(backend: &dyn TextBackend, count: usize) -> Vec<String> {
    let prompt = format!(
        "List {count} distinct, short, currently trending conversation topics, \
         one per line, with no numbering or extra commentary."
    );

    let response = with_backoff("produce_topics", || {
        backend.generate(
            "You list concise trending topics.",
            &prompt,
            GenerateOptions::default(),
        )
    })
    .await;

    let topics = match response {
        Ok(text) => parse_topics(&text),
        Err(e) => {
            warn!(error = %e, "topic generation failed, using fallback");
            Vec::new()
        }
    };

    if topics.len() >= count.min(FALLBACK_TOPICS.len()).max(1) {
        topics.into_iter().take(count).collect()
    } else {
        warn!("fewer than requested distinct topics, using fallback catalog");
        FALLBACK_TOPICS
            .iter()
            .take(count)
            .map(|s| s.to_string())
            .collect()
    }
}

fn parse_topics(text: &str) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut topics = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim().trim_start_matches(|c: char| c == '-' || c == '*' || c.is_ascii_digit() || c == '.');
        let trimmed = trimmed.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            topics.push(trimmed.to_string());
        }
    }
    topics
}
