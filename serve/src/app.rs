//! Axum app: configuration, shared state, and router.
//!
//! Routes: `GET /` (UI shell), `GET /static/*` (assets), `POST /upload` (PDF upload),
//! `POST /chat` (question → answer), `GET /health`. Every route runs behind the session
//! middleware, which resolves the caller's session id from the `docchat_session` cookie.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use docchat::{DocumentExtractor, LlmClient, SessionScope, SessionStore, DEFAULT_MAX_EXCHANGES};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::chat::chat;
use super::session::session_middleware;
use super::upload::upload;

/// Largest accepted `DOCCHAT_HISTORY_EXCHANGES`; every exchange is resent in each prompt.
pub const MAX_HISTORY_EXCHANGES: usize = 1000;

fn clamp_history_exchanges(requested: usize) -> usize {
    if requested > MAX_HISTORY_EXCHANGES {
        tracing::warn!(
            requested,
            max = MAX_HISTORY_EXCHANGES,
            "DOCCHAT_HISTORY_EXCHANGES too large; clamped"
        );
        return MAX_HISTORY_EXCHANGES;
    }
    requested
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServeConfig {
    /// Listen address.
    pub addr: String,
    /// Directory for transient uploaded files (created on startup).
    pub upload_dir: PathBuf,
    /// Directory holding `index.html` and static assets.
    pub static_dir: PathBuf,
    /// Maximum request body size for uploads.
    pub max_upload_bytes: usize,
    /// Exchanges retained per conversation.
    pub history_exchanges: usize,
    /// Bound for one generation call; `None` waits indefinitely.
    pub generation_timeout: Option<Duration>,
    /// Per-client (cookie) or shared conversation state.
    pub session_scope: SessionScope,
    /// Sessions idle longer than this are dropped.
    pub session_idle: Duration,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:5000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
            max_upload_bytes: 100 * 1024 * 1024,
            history_exchanges: DEFAULT_MAX_EXCHANGES,
            generation_timeout: Some(Duration::from_secs(60)),
            session_scope: SessionScope::PerClient,
            session_idle: Duration::from_secs(3600),
        }
    }
}

impl ServeConfig {
    /// Builds the config from environment variables, falling back to [`Default`] for unset or
    /// invalid values.
    ///
    /// - `DOCCHAT_ADDR` (default `0.0.0.0:5000`)
    /// - `DOCCHAT_UPLOAD_DIR` (default `uploads`)
    /// - `DOCCHAT_STATIC_DIR` (default `static`)
    /// - `DOCCHAT_MAX_UPLOAD_BYTES` (default 100 MiB)
    /// - `DOCCHAT_HISTORY_EXCHANGES` (default 5, at most [`MAX_HISTORY_EXCHANGES`])
    /// - `DOCCHAT_GENERATION_TIMEOUT_SECS` (default 60; 0 disables)
    /// - `DOCCHAT_SESSION_MODE` (`cookie` or `shared`, default `cookie`)
    /// - `DOCCHAT_SESSION_IDLE_SECS` (default 3600)
    pub fn from_env() -> Self {
        let default = Self::default();
        let timeout_secs = config::env_parse(
            "DOCCHAT_GENERATION_TIMEOUT_SECS",
            default.generation_timeout.map(|d| d.as_secs()).unwrap_or(0),
        );
        let session_scope = match std::env::var("DOCCHAT_SESSION_MODE") {
            Ok(mode) => mode.parse().unwrap_or_else(|e: String| {
                tracing::warn!("{}; using cookie sessions", e);
                default.session_scope
            }),
            Err(_) => default.session_scope,
        };
        Self {
            addr: config::env_string("DOCCHAT_ADDR", &default.addr),
            upload_dir: std::env::var_os("DOCCHAT_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),
            static_dir: std::env::var_os("DOCCHAT_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.static_dir),
            max_upload_bytes: config::env_parse(
                "DOCCHAT_MAX_UPLOAD_BYTES",
                default.max_upload_bytes,
            ),
            history_exchanges: clamp_history_exchanges(config::env_parse(
                "DOCCHAT_HISTORY_EXCHANGES",
                default.history_exchanges,
            )),
            generation_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            session_scope,
            session_idle: Duration::from_secs(config::env_parse(
                "DOCCHAT_SESSION_IDLE_SECS",
                default.session_idle.as_secs(),
            )),
        }
    }
}

/// Shared state for all routes.
///
/// Injected into the router; handlers look up the caller's conversation context in
/// `sessions` and use the shared generation and extraction capabilities.
pub struct AppState {
    pub(crate) sessions: SessionStore,
    pub(crate) llm: Arc<dyn LlmClient>,
    pub(crate) extractor: Arc<dyn DocumentExtractor>,
    pub(crate) config: ServeConfig,
}

impl AppState {
    pub fn new(
        config: ServeConfig,
        llm: Arc<dyn LlmClient>,
        extractor: Arc<dyn DocumentExtractor>,
    ) -> Self {
        Self {
            sessions: SessionStore::new(
                config.session_scope,
                config.history_exchanges,
                config.generation_timeout,
            ),
            llm,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &ServeConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    sessions: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.sessions.len(),
    })
}

/// Builds the router with all routes, the session middleware, the upload body limit and
/// HTTP tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();
    let max_upload_bytes = state.config.max_upload_bytes;
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/upload", post(upload))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(middleware::from_fn(session_middleware))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
