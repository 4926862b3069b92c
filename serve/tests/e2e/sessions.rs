use std::sync::Arc;

use docchat::{MockLlm, SessionScope};
use reqwest::StatusCode;

use super::common;

/// **Scenario**: Two browsers with their own cookies never see each other's document or history.
#[tokio::test]
async fn e2e_cookie_sessions_are_isolated() {
    let server = common::spawn_server(MockLlm::with_answer("ok")).await;
    let alice = common::session_client();
    let bob = common::session_client();

    common::upload_bytes(&alice, &server, "a.pdf", b"alice document").await;
    common::ask(&alice, &server, "alice question").await;

    common::ask(&bob, &server, "bob question").await;
    let prompt = server.llm.last_prompt().unwrap();
    assert!(!prompt.contains("alice document"));
    assert!(!prompt.contains("alice question"));
    assert!(prompt.starts_with("PDF Content: \n\nChat History:\nHuman: bob question"));

    common::ask(&alice, &server, "again").await;
    let prompt = server.llm.last_prompt().unwrap();
    assert!(prompt.contains("alice document"));
    assert!(prompt.contains("Human: alice question\nAI: ok\n"));
    server.stop().await;
}

#[tokio::test]
async fn e2e_new_client_receives_session_cookie() {
    let server = common::spawn_server(MockLlm::with_answer("ok")).await;
    let resp = reqwest::Client::new()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("docchat_session="), "{}", cookie);
    assert!(cookie.contains("HttpOnly"));
    server.stop().await;
}

/// **Scenario**: In shared mode every client reads and writes one conversation.
#[tokio::test]
async fn e2e_shared_scope_shares_context() {
    let server = common::spawn_server_with(
        MockLlm::with_answer("ok"),
        Arc::new(common::PlainTextExtractor),
        SessionScope::Shared,
    )
    .await;
    let first = common::session_client();
    let second = common::session_client();

    common::upload_bytes(&first, &server, "doc.pdf", b"shared document").await;
    common::ask(&first, &server, "from first").await;
    common::ask(&second, &server, "from second").await;

    let prompt = server.llm.last_prompt().unwrap();
    assert!(prompt.contains("shared document"));
    assert!(prompt.contains("Human: from first\nAI: ok\nHuman: from second\nAI:"));
    assert_eq!(server.state.sessions().len(), 1);
    server.stop().await;
}

/// **Scenario**: Concurrent questions in one session are serialized; every exchange lands intact.
#[tokio::test]
async fn e2e_concurrent_questions_keep_history_consistent() {
    let server = common::spawn_server(MockLlm::with_answer("ok")).await;
    let client = common::session_client();
    common::ask(&client, &server, "warm-up").await;

    let mut tasks = Vec::new();
    for i in 0..4 {
        let client = client.clone();
        let url = server.url("/chat");
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&serde_json::json!({ "question": format!("c{}", i) }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::OK);
    }

    common::ask(&client, &server, "last").await;
    let prompt = server.llm.last_prompt().unwrap();
    assert_eq!(prompt.matches("\nAI: ok\n").count(), 5);
    server.stop().await;
}
