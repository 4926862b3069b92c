//! Mock LLM for tests and the CLI dry-run path.
//!
//! Returns scripted answers in order (repeating the last one), records every prompt it
//! receives, and can be configured to fail or to answer slowly.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::llm::{LlmClient, LlmResponse};

/// Mock LLM: scripted answers, recorded prompts.
///
/// **Interaction**: Implements [`LlmClient`]; used by context, session and server tests.
pub struct MockLlm {
    /// Answers still to hand out; the last one is repeated once the queue is down to one.
    answers: Mutex<VecDeque<String>>,
    /// Every prompt passed to `generate`, in call order.
    prompts: Mutex<Vec<String>>,
    /// When set, every call fails with this message.
    failure: Option<String>,
    /// Sleep before answering (timeout tests).
    delay: Option<Duration>,
}

impl MockLlm {
    /// Always answers `answer`.
    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self::with_answers([answer.into()])
    }

    /// Answers in order; once one answer is left it is returned for every further call.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            failure: None,
            delay: None,
        }
    }

    /// Every call fails with [`LlmError::RequestFailed`] carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::with_answers(Vec::<String>::new())
        }
    }

    /// Sleep `delay` before answering (builder).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    fn next_answer(&self) -> String {
        let Ok(mut answers) = self.answers.lock() else {
            return String::new();
        };
        if answers.len() > 1 {
            answers.pop_front().unwrap_or_default()
        } else {
            answers.front().cloned().unwrap_or_default()
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(ref message) = self.failure {
            return Err(LlmError::RequestFailed(message.clone()));
        }
        Ok(LlmResponse {
            content: self.next_answer(),
            usage: None,
        })
    }
}
