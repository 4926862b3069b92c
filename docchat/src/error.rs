//! Error types for generation, extraction and question answering.
//!
//! Each external capability gets its own enum; [`ChatError`] is what
//! [`crate::ContextManager::answer_question`] returns.

use std::time::Duration;

use thiserror::Error;

/// Generation capability failure (network, auth, quota, malformed completion).
#[derive(Debug, Error)]
pub enum LlmError {
    /// Building or sending the request failed, or the API answered with an error.
    #[error("generation request failed: {0}")]
    RequestFailed(String),

    /// The API answered without any completion choice.
    #[error("generation returned no choices")]
    NoChoices,
}

/// Document text extraction failure. The caller's document text stays unchanged.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Reading the transient file failed.
    #[error("read document: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a loadable PDF (corrupt, truncated, encrypted).
    #[error("load pdf: {0}")]
    Load(String),

    /// Text of one page could not be decoded.
    #[error("extract text from page {page}: {message}")]
    Page { page: u32, message: String },
}

/// Failure of one question/answer exchange. History is not mutated when this is returned.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The generation capability returned an error.
    #[error(transparent)]
    Generation(#[from] LlmError),

    /// The generation capability did not answer within the configured bound.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}
