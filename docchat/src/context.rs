//! Conversational context manager: current document text plus bounded history.
//!
//! One `ContextManager` is one conversation. It is a plain value; callers that share it
//! across tasks wrap it in a mutex (see [`crate::SessionStore`]) and hold the lock for the
//! whole [`ContextManager::answer_question`] so exchanges never interleave.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ChatError;
use crate::history::ConversationHistory;
use crate::llm::LlmClient;
use crate::prompt::build_prompt;

/// Document text and conversation history for one conversation.
#[derive(Debug, Clone, Default)]
pub struct ContextManager {
    document_text: String,
    history: ConversationHistory,
    generation_timeout: Option<Duration>,
}

impl ContextManager {
    /// Empty document, default history bound (5 exchanges), no generation timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty document with a history that keeps at most `max_exchanges` exchanges.
    pub fn with_max_exchanges(max_exchanges: usize) -> Self {
        Self {
            history: ConversationHistory::with_max_exchanges(max_exchanges),
            ..Self::default()
        }
    }

    /// Bound each generation call (builder). `None` waits indefinitely.
    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Replaces the document text. History is kept.
    pub fn set_document(&mut self, text: impl Into<String>) {
        self.document_text = text.into();
        debug!(document_len = self.document_text.len(), "document replaced");
    }

    pub fn document_text(&self) -> &str {
        &self.document_text
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Builds the prompt the next `answer_question(question)` would send.
    pub fn prompt_for(&self, question: &str) -> String {
        build_prompt(&self.document_text, &self.history, question)
    }

    /// Answers `question` with `llm` and records the exchange.
    ///
    /// The answer is returned verbatim and appended to history even when empty. On a
    /// generation error or timeout nothing is appended.
    pub async fn answer_question<L>(&mut self, question: &str, llm: &L) -> Result<String, ChatError>
    where
        L: LlmClient + ?Sized,
    {
        let prompt = self.prompt_for(question);
        debug!(
            prompt_len = prompt.len(),
            history_len = self.history.len(),
            "generating answer"
        );

        let response = match self.generation_timeout {
            Some(limit) => match tokio::time::timeout(limit, llm.generate(&prompt)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(timeout = ?limit, "generation timed out");
                    return Err(ChatError::Timeout(limit));
                }
            },
            None => llm.generate(&prompt).await,
        }
        .map_err(|e| {
            warn!(error = %e, "generation failed");
            ChatError::from(e)
        })?;

        self.history.push_exchange(question, response.content.clone());
        Ok(response.content)
    }

    /// Forgets all exchanges; the document text is kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
