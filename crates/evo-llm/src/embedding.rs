use async_trait::async_trait;

pub type Embedding = Vec<f32>;

/// Opaque embedding capability: fixed dimensionality, same input always
/// yields the same vector within a process. Grounded on
/// `beagle_llm::embedding::EmbeddingClient`.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn embed(&self, text: &str) -> anyhow::Result<Embedding>;
}

/// Lets a shared `Arc<dyn EmbeddingBackend>` be passed anywhere a
/// concrete `EmbeddingBackend` is expected, so the engine's embedder can
/// be reused by a `HeuristicEvaluator` instead of constructing a second
/// one.
#[async_trait]
impl EmbeddingBackend for std::sync::Arc<dyn EmbeddingBackend> {
    async fn embed(&self, text: &str) -> anyhow::Result<Embedding> {
        self.as_ref().embed(text).await
    }
}

/// Cosine distance `1 - cos(u, v)`, clamped to `[0, 1]`. Orthogonal or
/// zero-norm vectors are treated as maximally distant.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    (1.0 - dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_are_zero_distance() {
        let v = vec![0.1, 0.2, 0.3];
        assert!(cosine_distance(&v, &v) < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_are_unit_distance() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_is_maximally_distant() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_distance(&a, &b), 1.0);
    }
}
