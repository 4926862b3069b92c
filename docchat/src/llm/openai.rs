//! OpenAI-compatible Chat Completions client implementing [`LlmClient`].
//!
//! The assembled prompt is sent as a single user message; the first choice's content is
//! the completion. Any OpenAI-compatible endpoint works by pointing `OPENAI_BASE_URL` at
//! it (e.g. Gemini's `https://generativelanguage.googleapis.com/v1beta/openai`).
//!
//! **Interaction**: Implements `LlmClient`; built by the CLI from the environment.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::LlmError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage};

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

/// Model used when `DOCCHAT_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI Chat Completions client.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    api_base: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), DEFAULT_API_BASE, model)
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    /// `api_base` is only used for logging; the request goes wherever `config` points.
    pub fn with_config(
        config: OpenAIConfig,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            api_base: api_base.into(),
            temperature: None,
        }
    }

    /// Builds a client from the environment:
    ///
    /// - `OPENAI_API_KEY`: API key.
    /// - `OPENAI_BASE_URL` (or `OPENAI_API_BASE`): API base including the version path;
    ///   default `https://api.openai.com/v1`.
    /// - `DOCCHAT_MODEL`: model name; default [`DEFAULT_MODEL`].
    /// - `DOCCHAT_TEMPERATURE`: optional sampling temperature (0–2).
    pub fn from_env() -> Self {
        let model = std::env::var("DOCCHAT_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = std::env::var("OPENAI_BASE_URL")
            .or_else(|_| std::env::var("OPENAI_API_BASE"))
            .map(|b| b.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let mut config = OpenAIConfig::new().with_api_base(api_base.clone());
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config = config.with_api_key(key);
        }
        let client = Self::with_config(config, api_base, model);
        match std::env::var("DOCCHAT_TEMPERATURE")
            .ok()
            .and_then(|t| t.parse::<f32>().ok())
        {
            Some(t) => client.with_temperature(t),
            None => client,
        }
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt),
        )]);
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        let request = args
            .build()
            .map_err(|e| LlmError::RequestFailed(format!("request build failed: {}", e)))?;

        let url = self.chat_completions_url();
        debug!(
            url = %url,
            model = %self.model,
            prompt_len = prompt.len(),
            temperature = ?self.temperature,
            "chat completion create"
        );
        trace!(url = %url, prompt = %prompt, "chat completion prompt");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::RequestFailed(format!("API error: {}", e)))?;

        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::NoChoices)?;
        let content = choice.message.content.unwrap_or_default();
        debug!(
            url = %url,
            completion_len = content.len(),
            usage = ?usage,
            "chat completion done"
        );
        Ok(LlmResponse { content, usage })
    }
}
