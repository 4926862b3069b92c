//! Bounded conversation history.
//!
//! Entries are appended in pairs (Human question, AI answer). The history holds at most
//! `2 * max_exchanges` entries; the bound is enforced on every insert by dropping the
//! oldest entries first, so the retained entries are always the most recent ones in
//! chronological order.

use std::collections::VecDeque;
use std::fmt;

/// Number of exchanges kept by [`ConversationHistory::default`] (10 entries).
pub const DEFAULT_MAX_EXCHANGES: usize = 5;

/// Who produced a history entry. Renders as `Human` / `AI` in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Role {
    Human,
    #[serde(rename = "AI")]
    Ai,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Human => "Human",
            Role::Ai => "AI",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    role: Role,
    content: String,
}

impl HistoryEntry {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Upper bound on the capacity reserved up front; larger histories grow on demand.
const PREALLOC_ENTRIES: usize = 64;

/// Fixed-capacity, chronologically ordered history of exchanges.
///
/// **Interaction**: Owned by [`crate::ContextManager`]; read by [`crate::build_prompt`].
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_max_exchanges(DEFAULT_MAX_EXCHANGES)
    }
}

impl ConversationHistory {
    /// Keeps at most `max_exchanges` question/answer pairs. Zero disables history.
    pub fn with_max_exchanges(max_exchanges: usize) -> Self {
        let max_entries = max_exchanges.saturating_mul(2);
        Self {
            entries: VecDeque::with_capacity(max_entries.min(PREALLOC_ENTRIES) + 2),
            max_entries,
        }
    }

    /// Appends `{Human, question}` then `{AI, answer}` and drops the oldest entries
    /// until the bound holds again.
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.entries.push_back(HistoryEntry::human(question));
        self.entries.push_back(HistoryEntry::ai(answer));
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
