pub mod ollama;
pub mod prompts;
pub mod structured;

use async_trait::async_trait;

use crate::errors::Result;

/// A model service capable of schema-constrained generation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the raw reply text produced under `schema`.
    async fn generate(&self, prompt: &str, schema: &serde_json::Value) -> Result<String>;
}
