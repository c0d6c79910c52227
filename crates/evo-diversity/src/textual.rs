use evo_llm::{cosine_distance, EmbeddingBackend};

/// Mean pairwise cosine distance over a set of texts' embeddings, clamped
/// to `[0, 1]`. With fewer than two non-empty texts the score is 0.
/// Grounded on `beagle_agents::darwin_cycle::DarwinCycle::calculate_diversity`'s
/// nested-loop pairwise aggregation shape.
pub async fn textual_diversity(
    texts: &[String],
    embedder: &dyn EmbeddingBackend,
) -> anyhow::Result<f64> {
    let non_empty: Vec<&String> = texts.iter().filter(|t| !t.trim().is_empty()).collect();
    if non_empty.len() < 2 {
        return Ok(0.0);
    }

    let mut embeddings = Vec::with_capacity(non_empty.len());
    for text in &non_empty {
        embeddings.push(embedder.embed(text).await?);
    }

    Ok(mean_pairwise_distance(&embeddings))
}

fn mean_pairwise_distance(embeddings: &[Vec<f32>]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for i in 0..embeddings.len() {
        for j in (i + 1)..embeddings.len() {
            total += cosine_distance(&embeddings[i], &embeddings[j]);
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        (total / count as f64).clamp(0.0, 1.0)
    }
}

/// Mean embedding of a set of texts authored by one agent, for population
/// textual diversity (mean-embedding-per-agent, then pairwise distance
/// across agents).
pub async fn mean_embedding(
    texts: &[String],
    embedder: &dyn EmbeddingBackend,
) -> anyhow::Result<Option<Vec<f32>>> {
    let non_empty: Vec<&String> = texts.iter().filter(|t| !t.trim().is_empty()).collect();
    if non_empty.is_empty() {
        return Ok(None);
    }

    let mut embeddings = Vec::with_capacity(non_empty.len());
    for text in &non_empty {
        embeddings.push(embedder.embed(text).await?);
    }

    let dims = embeddings[0].len();
    let mut mean = vec![0.0f32; dims];
    for emb in &embeddings {
        for (m, v) in mean.iter_mut().zip(emb.iter()) {
            *m += v;
        }
    }
    let n = embeddings.len() as f32;
    for m in &mut mean {
        *m /= n;
    }

    Ok(Some(mean))
}

/// Population textual diversity: mean pairwise cosine distance between
/// each agent's mean embedding.
pub fn population_diversity(agent_mean_embeddings: &[Vec<f32>]) -> f64 {
    mean_pairwise_distance(agent_mean_embeddings)
}
