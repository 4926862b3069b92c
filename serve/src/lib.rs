//! HTTP server for docchat (axum).
//!
//! Listens on `0.0.0.0:5000` by default; serves the UI shell and handles `/upload` and `/chat`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`router`], [`AppState`],
//! [`ServeConfig`].

mod app;
mod chat;
mod response;
mod session;
mod upload;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use docchat::{LlmClient, PdfExtractor};
use tokio::net::TcpListener;
use tracing::{debug, info};

pub use app::{router, AppState, ServeConfig, MAX_HISTORY_EXCHANGES};

/// Drops idle sessions every `session_idle / 4` (at most once a minute, at least once a second).
fn spawn_session_pruner(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let max_idle = state.config.session_idle;
    let period = (max_idle / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(period);
        tick.tick().await;
        loop {
            tick.tick().await;
            let removed = state.sessions.prune_idle(max_idle);
            if removed > 0 {
                debug!(removed, "idle sessions dropped");
            }
        }
    })
}

/// Serves on an existing listener until `shutdown` resolves. Used by tests (bind to
/// 127.0.0.1:0 then pass the listener and a oneshot receiver).
pub async fn run_serve_on_listener<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    info!(
        addr = %addr,
        upload_dir = %state.config.upload_dir.display(),
        static_dir = %state.config.static_dir.display(),
        session_scope = ?state.config.session_scope,
        "docchat server listening on http://{}",
        addr
    );

    let pruner = spawn_session_pruner(Arc::clone(&state));
    let app = router(state);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;
    pruner.abort();
    result?;
    info!("server stopped");
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Binds `config.addr` and serves with the PDF extractor until Ctrl-C.
pub async fn run_serve(
    config: ServeConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(&config.addr).await?;
    let state = Arc::new(AppState::new(config, llm, Arc::new(PdfExtractor::new())));
    run_serve_on_listener(listener, state, ctrl_c()).await
}
