//! # docchat
//!
//! Ask questions about an uploaded PDF. The document's text and a short rolling chat
//! history are concatenated into one prompt per question and sent to a stateless
//! text-completion model.
//!
//! ## Design principles
//!
//! - **Explicit context**: document text and history live in a [`ContextManager`] value,
//!   never in ambient globals. The HTTP layer keeps one per session in a [`SessionStore`].
//! - **Bounded history**: [`ConversationHistory`] enforces its maximum length on every insert,
//!   so the prompt never grows past the last few exchanges.
//! - **Fallible generation**: [`LlmClient::generate`] returns a `Result`; the context manager
//!   adds an optional timeout and surfaces both as [`ChatError`].
//!
//! ## Main modules
//!
//! - [`context`]: [`ContextManager`] (`set_document`, `answer_question`).
//! - [`history`]: [`ConversationHistory`], [`HistoryEntry`], [`Role`].
//! - [`prompt`]: [`build_prompt`].
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], [`ChatOpenAI`].
//! - [`extract`]: [`DocumentExtractor`] trait, [`PdfExtractor`], filename helpers.
//! - [`session`]: [`SessionStore`], [`SessionScope`].
//! - [`error`]: [`ChatError`], [`LlmError`], [`ExtractError`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use docchat::{ContextManager, MockLlm};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let llm = MockLlm::with_answer("42 dollars.");
//! let mut ctx = ContextManager::new();
//! ctx.set_document("Invoice\nTotal: $42");
//! let answer = ctx.answer_question("What is the total?", &llm).await.unwrap();
//! assert_eq!(answer, "42 dollars.");
//! # }
//! ```

pub mod context;
pub mod error;
pub mod extract;
pub mod history;
pub mod llm;
pub mod prompt;
pub mod session;

pub use context::ContextManager;
pub use error::{ChatError, ExtractError, LlmError};
pub use extract::{is_pdf_filename, sanitize_filename, DocumentExtractor, PdfExtractor};
pub use history::{ConversationHistory, HistoryEntry, Role, DEFAULT_MAX_EXCHANGES};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm};
pub use prompt::build_prompt;
pub use session::{new_session_id, SessionScope, SessionStore, SHARED_SESSION_ID};
