//! Generation capability: a stateless text-completion service.
//!
//! [`crate::ContextManager`] depends on a callable that turns one prompt string into
//! completion text; this module defines the trait, an OpenAI-compatible client and a mock.
//! Implementations hold no conversation state, so all context must be in the prompt.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::LlmError;

/// Token usage for one generation call (prompt + completion).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    /// Tokens in the prompt (input).
    pub prompt_tokens: u32,
    /// Tokens in the completion (output).
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

/// Response from one generation call.
///
/// **Interaction**: Returned by [`LlmClient::generate`]; the context manager stores
/// `content` as the AI history entry without trimming.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Raw completion text.
    pub content: String,
    /// Token usage for this call, when the backend reports it.
    pub usage: Option<LlmUsage>,
}

/// Text-completion client: given a full prompt, returns the completion.
///
/// Implementations: [`MockLlm`] (scripted answers), [`ChatOpenAI`] (OpenAI-compatible API).
///
/// **Interaction**: Used by [`crate::ContextManager::answer_question`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for `prompt`. May be slow (seconds) and may fail.
    async fn generate(&self, prompt: &str) -> Result<LlmResponse, LlmError>;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        (**self).generate(prompt).await
    }
}
