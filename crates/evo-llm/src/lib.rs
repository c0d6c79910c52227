//! External-capability boundary: text generation and embeddings. Both are
//! opaque single-method async-trait capabilities, grounded on
//! `beagle_core::traits::LlmClient` and `beagle_llm::embedding`.

mod backend;
mod embedding;
mod http;
mod mock;
mod retry;

pub use backend::{GenerateOptions, TextBackend};
pub use embedding::{cosine_distance, Embedding, EmbeddingBackend};
pub use http::{HttpEmbeddingBackend, HttpTextBackend};
pub use mock::{HashEmbeddingBackend, ScriptedBackend};
pub use retry::with_backoff;
