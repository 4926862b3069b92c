//! Per-session conversation contexts.
//!
//! The server keeps one [`ContextManager`] per session id (carried by a cookie), each behind
//! its own `tokio::sync::Mutex` so concurrent requests of one session are serialized and
//! different sessions never see each other's document or history. [`SessionScope::Shared`]
//! maps every id to one context, for single-user deployments.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::context::ContextManager;

/// Key of the single context used in [`SessionScope::Shared`].
pub const SHARED_SESSION_ID: &str = "shared";

/// How conversation state is scoped across clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionScope {
    /// One context per session id. Default.
    #[default]
    PerClient,
    /// One context for all clients.
    Shared,
}

impl std::str::FromStr for SessionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cookie" | "session" | "per-client" => Ok(Self::PerClient),
            "shared" | "global" => Ok(Self::Shared),
            _ => Err(format!(
                "unknown session mode: {} (use cookie or shared)",
                s
            )),
        }
    }
}

/// New random session id (UUID v4).
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

struct Session {
    context: Arc<Mutex<ContextManager>>,
    last_used: Instant,
}

/// Registry of conversation contexts keyed by session id.
///
/// **Interaction**: Held in the server's shared state; `/upload` and `/chat` look up the
/// caller's context here and lock it for the duration of the operation.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    scope: SessionScope,
    max_exchanges: usize,
    generation_timeout: Option<Duration>,
}

impl SessionStore {
    pub fn new(
        scope: SessionScope,
        max_exchanges: usize,
        generation_timeout: Option<Duration>,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            scope,
            max_exchanges,
            generation_timeout,
        }
    }

    pub fn scope(&self) -> SessionScope {
        self.scope
    }

    /// Context for `session_id`, created empty on first use. Marks the session as used.
    pub fn context(&self, session_id: &str) -> Arc<Mutex<ContextManager>> {
        let key = match self.scope {
            SessionScope::PerClient => session_id,
            SessionScope::Shared => SHARED_SESSION_ID,
        };
        let mut session = self.sessions.entry(key.to_string()).or_insert_with(|| {
            info!(session_id = %key, "new conversation context");
            Session {
                context: Arc::new(Mutex::new(
                    ContextManager::with_max_exchanges(self.max_exchanges)
                        .with_generation_timeout(self.generation_timeout),
                )),
                last_used: Instant::now(),
            }
        });
        session.last_used = Instant::now();
        Arc::clone(&session.context)
    }

    /// Whether a context exists for `session_id` (without creating one).
    pub fn contains(&self, session_id: &str) -> bool {
        match self.scope {
            SessionScope::PerClient => self.sessions.contains_key(session_id),
            SessionScope::Shared => self.sessions.contains_key(SHARED_SESSION_ID),
        }
    }

    /// Drops sessions idle for longer than `max_idle`; returns how many were dropped.
    /// The shared context is never dropped.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        if self.scope == SessionScope::Shared {
            return 0;
        }
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.last_used.elapsed() <= max_idle);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, remaining = self.sessions.len(), "pruned idle sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
