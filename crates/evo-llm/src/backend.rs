use async_trait::async_trait;

/// Optional per-call generation parameters.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub model_id: Option<String>,
    pub temperature: Option<f32>,
}

/// Opaque text-generation capability. Contract: never raises for
/// model-level refusals — returns an empty string instead; may raise for
/// transport errors, which the caller retries.
///
/// Grounded on `beagle_core::traits::LlmClient`: a single-method,
/// `Send + Sync` async-trait capability rather than a deep hierarchy.
#[async_trait]
pub trait TextBackend: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: GenerateOptions,
    ) -> anyhow::Result<String>;
}

/// Lets a shared `Arc<dyn TextBackend>` be passed anywhere a concrete
/// `TextBackend` is expected, so one backend instance can be reused by
/// both the engine and a `BackendMutator` instead of constructing two.
#[async_trait]
impl TextBackend for std::sync::Arc<dyn TextBackend> {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: GenerateOptions,
    ) -> anyhow::Result<String> {
        self.as_ref().generate(system_prompt, user_prompt, options).await
    }
}
