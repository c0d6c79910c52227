use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{GenerateOptions, TextBackend};
use crate::embedding::{Embedding, EmbeddingBackend};

/// Deterministic, script-driven stand-in for the text backend, used by
/// tests and the determinism property in place of any real API. Grounded
/// on `beagle_llm::clients::mock::MockLlmClient`'s "synthesize a reply
/// without calling out" approach, generalized to a lookup table keyed by
/// a substring of the user prompt so tests can script post/reply/engage
/// answers independently. Matches are first-match-wins over
/// insertion order, kept in a `Vec` rather than a `HashMap` so the
/// determinism property this mock exists to serve isn't undermined by
/// the hasher's randomized iteration order when a prompt matches more
/// than one configured substring.
pub struct ScriptedBackend {
    responses: Vec<(String, String)>,
    default_response: String,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(default_response: impl Into<String>) -> Self {
        Self {
            responses: Vec::new(),
            default_response: default_response.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, prompt_contains: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.push((prompt_contains.into(), response.into()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextBackend for ScriptedBackend {
    async fn generate(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _options: GenerateOptions,
    ) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(user_prompt.to_string());

        for (needle, response) in &self.responses {
            if user_prompt.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(self.default_response.clone())
    }
}

/// Deterministic embedding stand-in: a bag-of-characters fingerprint, so
/// distinct texts get distinct (but reproducible) vectors without any
/// network call.
pub struct HashEmbeddingBackend {
    dimensions: usize,
}

impl HashEmbeddingBackend {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingBackend for HashEmbeddingBackend {
    async fn embed(&self, text: &str) -> anyhow::Result<Embedding> {
        let mut buckets = vec![0.0f32; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            let bucket = (byte as usize + i) % self.dimensions;
            buckets[bucket] += 1.0;
        }
        let norm: f32 = buckets.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for b in &mut buckets {
                *b /= norm;
            }
        }
        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_backend_matches_on_substring() {
        let backend = ScriptedBackend::new("default").with_response("yes/no", "yes");
        let out = backend
            .generate("sys", "would this persona reply? yes/no", GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(out, "yes");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_backend_uses_first_matching_response() {
        let backend = ScriptedBackend::new("default")
            .with_response("yes", "first")
            .with_response("yes/no", "second");
        let out = backend
            .generate("sys", "would this persona reply? yes/no", GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(out, "first");
    }

    #[tokio::test]
    async fn hash_embedding_is_deterministic() {
        let backend = HashEmbeddingBackend::new(16);
        let a = backend.embed("hello world").await.unwrap();
        let b = backend.embed("hello world").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn hash_embedding_distinguishes_distinct_text() {
        let backend = HashEmbeddingBackend::new(16);
        let a = backend.embed("hello world").await.unwrap();
        let b = backend.embed("goodbye moon").await.unwrap();
        assert_ne!(a, b);
    }
}
