//! Shared helpers for e2e tests: spawn a server with injected capabilities, build clients.

use std::path::Path;
use std::sync::Arc;

use docchat::{DocumentExtractor, ExtractError, MockLlm, SessionScope};
use serve::{AppState, ServeConfig};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Treats the uploaded file as UTF-8 text, so tests can "upload a PDF" with known contents.
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

pub struct TestServer {
    pub base: String,
    pub llm: Arc<MockLlm>,
    pub state: Arc<AppState>,
    pub dir: tempfile::TempDir,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn upload_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    /// Signals graceful shutdown and waits for the server task.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
        }
    }
}

pub async fn spawn_server(llm: MockLlm) -> TestServer {
    spawn_server_with(llm, Arc::new(PlainTextExtractor), SessionScope::PerClient).await
}

pub async fn spawn_server_with(
    llm: MockLlm,
    extractor: Arc<dyn DocumentExtractor>,
    session_scope: SessionScope,
) -> TestServer {
    spawn_server_configured(llm, extractor, |config| config.session_scope = session_scope).await
}

/// Bind to a random port and serve with the given LLM and extractor; `configure` adjusts the
/// config after the temp dirs are filled in.
pub async fn spawn_server_configured(
    llm: MockLlm,
    extractor: Arc<dyn DocumentExtractor>,
    configure: impl FnOnce(&mut ServeConfig),
) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let static_dir = dir.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(
        static_dir.join("index.html"),
        "<!doctype html><title>docchat</title>",
    )
    .unwrap();
    std::fs::write(static_dir.join("app.js"), "console.log('docchat');").unwrap();

    let mut config = ServeConfig {
        addr: "127.0.0.1:0".to_string(),
        upload_dir: dir.path().join("uploads"),
        static_dir,
        ..ServeConfig::default()
    };
    configure(&mut config);
    let llm = Arc::new(llm);
    let state = Arc::new(AppState::new(config, llm.clone(), extractor));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve::run_serve_on_listener(
        listener,
        Arc::clone(&state),
        async move {
            let _ = rx.await;
        },
    ));
    TestServer {
        base: format!("http://{}", addr),
        llm,
        state,
        dir,
        shutdown: Some(tx),
        handle: Some(handle),
    }
}

/// Client that keeps cookies, i.e. one browser session.
pub fn session_client() -> reqwest::Client {
    reqwest::Client::builder().cookie_store(true).build().unwrap()
}

pub async fn upload_bytes(
    client: &reqwest::Client,
    server: &TestServer,
    filename: &str,
    data: &[u8],
) -> reqwest::Response {
    let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename.to_string());
    let form = reqwest::multipart::Form::new().part("pdf-file", part);
    client
        .post(server.url("/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

/// Posts a question; returns status and parsed JSON body.
pub async fn ask(
    client: &reqwest::Client,
    server: &TestServer,
    question: &str,
) -> (reqwest::StatusCode, serde_json::Value) {
    let resp = client
        .post(server.url("/chat"))
        .json(&serde_json::json!({ "question": question }))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap();
    eprintln!("[e2e] received: {} {}", status, body);
    (status, body)
}
