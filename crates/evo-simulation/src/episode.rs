use evo_core::{Transcript, TranscriptEvent};
use evo_llm::{with_backoff, GenerateOptions, TextBackend};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::agent::SimulationAgent;
use crate::feed::Feed;

/// A completed episode's transcript plus the number of degraded
/// (backend-failure-placeholder) events, for the generation's
/// statistics record.
pub struct EpisodeOutcome {
    pub transcript: Transcript,
    pub degraded_events: u64,
}

fn placeholder(name: &str) -> String {
    format!("[{name} is thinking…]")
}

fn is_yes(response: &str) -> bool {
    response.to_lowercase().contains("yes")
}

/// Runs one group episode: Phase 1 has every agent post on `topic` in
/// population order; Phase 2 repeats `rounds` engage/reply/pass rounds
/// over a shuffled agent order, each round reading and extending a
/// single episode-local feed (§4.5). Phase 1 posts are independent of
/// each other; Phase 2 steps are strictly sequential because each reply
/// extends the feed subsequent engage decisions read.
#[instrument(skip(agents, backend, rng), fields(topic = topic, agents = agents.len()))]
pub async fn run_episode(
    agents: &mut [SimulationAgent],
    topic: &str,
    rounds: usize,
    backend: &dyn TextBackend,
    rng: &mut impl Rng,
) -> EpisodeOutcome {
    let mut transcript = Transcript::new();
    let mut feed = Feed::new();
    let mut degraded_events = 0u64;

    for agent in agents.iter_mut() {
        let content = generate_post(backend, agent, topic, &mut degraded_events).await;
        feed.push(agent.name(), content.clone());
        agent.record(format!("posted: {content}"));
        transcript.push(TranscriptEvent::Post {
            author: agent.name().to_string(),
            content,
        });
    }

    for round in 0..rounds {
        let mut order: Vec<usize> = (0..agents.len()).collect();
        order.shuffle(rng);
        debug!(round, "engage round");

        for idx in order {
            let name = agents[idx].name().to_string();
            let system_prompt = agents[idx].phenotype.system_prompt.clone();
            let Some(target) = feed.pick_excluding(&name, rng) else {
                continue;
            };
            let target_author = target.author.clone();
            let target_content = target.content.clone();

            let engage_prompt = format!(
                "{name} sees this message from {target_author}: \"{target_content}\"\n\
                 Would this persona reply? Answer yes or no."
            );
            let decision = with_backoff("engage_decision", || {
                backend.generate(&system_prompt, &engage_prompt, GenerateOptions::default())
            })
            .await;

            let wants_to_reply = match decision {
                Ok(text) => is_yes(&text),
                Err(_) => {
                    degraded_events += 1;
                    true
                }
            };

            if wants_to_reply {
                let reply_prompt = format!(
                    "Write a short reply to {target_author}'s message: \"{target_content}\""
                );
                let content = match with_backoff("reply", || {
                    backend.generate(&system_prompt, &reply_prompt, GenerateOptions::default())
                })
                .await
                {
                    Ok(text) if !text.trim().is_empty() => text,
                    _ => {
                        degraded_events += 1;
                        placeholder(&name)
                    }
                };

                feed.push(&name, content.clone());
                agents[idx].record(format!("replied to {target_author}: {content}"));
                transcript.push(TranscriptEvent::Reply {
                    author: name,
                    target_author,
                    content,
                    reply_to: target_content,
                });
            } else {
                agents[idx].record(format!("passed on {target_author}"));
                transcript.push(TranscriptEvent::Pass {
                    author: name,
                    target_author,
                });
            }
        }
    }

    EpisodeOutcome {
        transcript,
        degraded_events,
    }
}

async fn generate_post(
    backend: &dyn TextBackend,
    agent: &SimulationAgent,
    topic: &str,
    degraded_events: &mut u64,
) -> String {
    let prompt = format!("Write a short social media post about: {topic}");
    match with_backoff("post", || {
        backend.generate(&agent.phenotype.system_prompt, &prompt, GenerateOptions::default())
    })
    .await
    {
        Ok(text) if !text.trim().is_empty() => text,
        _ => {
            *degraded_events += 1;
            placeholder(agent.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_genome::{compile, Genotype};
    use evo_llm::ScriptedBackend;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn agent(name: &str) -> SimulationAgent {
        let genotype = Genotype::new(name);
        let phenotype = compile(&genotype);
        SimulationAgent::new(genotype, phenotype)
    }

    #[tokio::test]
    async fn phase_one_emits_one_post_per_agent() {
        let backend = ScriptedBackend::new("hello world");
        let mut agents = vec![agent("alice"), agent("bob")];
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = run_episode(&mut agents, "weather", 0, &backend, &mut rng).await;
        assert_eq!(outcome.transcript.len(), 2);
        assert!(outcome
            .transcript
            .iter()
            .all(|e| matches!(e, TranscriptEvent::Post { .. })));
    }

    #[tokio::test]
    async fn engage_round_with_no_substring_is_pass() {
        let backend = ScriptedBackend::new("no thanks");
        let mut agents = vec![agent("alice"), agent("bob")];
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = run_episode(&mut agents, "weather", 1, &backend, &mut rng).await;
        let passes = outcome
            .transcript
            .iter()
            .filter(|e| matches!(e, TranscriptEvent::Pass { .. }))
            .count();
        assert!(passes > 0);
    }

    #[tokio::test]
    async fn engage_round_with_yes_emits_reply() {
        let backend =
            ScriptedBackend::new("hello").with_response("Would this persona reply", "yes");
        let mut agents = vec![agent("alice"), agent("bob")];
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = run_episode(&mut agents, "weather", 1, &backend, &mut rng).await;
        let replies = outcome
            .transcript
            .iter()
            .filter(|e| matches!(e, TranscriptEvent::Reply { .. }))
            .count();
        assert!(replies > 0);
    }

    #[tokio::test]
    async fn single_agent_has_no_eligible_engage_target() {
        let backend = ScriptedBackend::new("hello");
        let mut agents = vec![agent("alice")];
        let mut rng = StdRng::seed_from_u64(4);
        let outcome = run_episode(&mut agents, "weather", 2, &backend, &mut rng).await;
        assert_eq!(outcome.transcript.len(), 1); // only the Phase 1 post
    }
}
