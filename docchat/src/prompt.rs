//! Prompt assembly.
//!
//! The generation capability is stateless, so every prompt carries the whole context:
//!
//! ```text
//! PDF Content: <document text>
//!
//! Chat History:
//! Human: <older question>
//! AI: <older answer>
//! Human: <question>
//! AI:
//! ```

use crate::history::ConversationHistory;

const DOCUMENT_LABEL: &str = "PDF Content: ";
const HISTORY_LABEL: &str = "\n\nChat History:\n";

/// Builds the completion prompt for `question` from the document text and history.
///
/// The document text and every entry's content are inserted verbatim. The prompt always
/// ends with `Human: <question>\nAI:` so the model continues as the AI.
pub fn build_prompt(document_text: &str, history: &ConversationHistory, question: &str) -> String {
    let history_len: usize = history
        .iter()
        .map(|e| e.role().as_str().len() + e.content().len() + 3)
        .sum();
    let mut prompt = String::with_capacity(
        DOCUMENT_LABEL.len()
            + document_text.len()
            + HISTORY_LABEL.len()
            + history_len
            + question.len()
            + 16,
    );
    prompt.push_str(DOCUMENT_LABEL);
    prompt.push_str(document_text);
    prompt.push_str(HISTORY_LABEL);
    for entry in history.iter() {
        prompt.push_str(entry.role().as_str());
        prompt.push_str(": ");
        prompt.push_str(entry.content());
        prompt.push('\n');
    }
    prompt.push_str("Human: ");
    prompt.push_str(question);
    prompt.push_str("\nAI:");
    prompt
}
