pub mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;

use crate::error::ProviderError;

/// Trait for text-completion providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a single-turn prompt and return the model's raw text.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// The model identifier requests are sent to.
    fn model(&self) -> &str;
}
