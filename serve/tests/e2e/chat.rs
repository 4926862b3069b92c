use std::sync::Arc;
use std::time::Duration;

use docchat::MockLlm;
use reqwest::StatusCode;

use super::common;

/// **Scenario**: Missing question → 400, no generation call, history unchanged.
#[tokio::test]
async fn e2e_chat_without_question_is_rejected() {
    let server = common::spawn_server(MockLlm::with_answer("ok")).await;
    let client = common::session_client();
    common::ask(&client, &server, "first").await;

    let resp = client
        .post(server.url("/chat"))
        .json(&serde_json::json!({ "not_question": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No question provided");
    assert_eq!(server.llm.call_count(), 1);

    common::ask(&client, &server, "second").await;
    let prompt = server.llm.last_prompt().unwrap();
    assert_eq!(prompt.matches("Human: ").count(), 2);
    server.stop().await;
}

#[tokio::test]
async fn e2e_chat_invalid_json_is_rejected() {
    let server = common::spawn_server(MockLlm::with_answer("ok")).await;
    let resp = reqwest::Client::new()
        .post(server.url("/chat"))
        .header("content-type", "application/json")
        .body("not valid json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("invalid json"));
    assert_eq!(server.llm.call_count(), 0);
    server.stop().await;
}

/// **Scenario**: Six exchanges over HTTP; the seventh prompt no longer contains exchange 1.
#[tokio::test]
async fn e2e_history_keeps_last_five_exchanges() {
    let server = common::spawn_server(MockLlm::with_answers([
        "a1", "a2", "a3", "a4", "a5", "a6", "a7",
    ]))
    .await;
    let client = common::session_client();
    for i in 1..=6 {
        let (status, body) = common::ask(&client, &server, &format!("q{}", i)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], format!("a{}", i));
    }
    common::ask(&client, &server, "q7").await;
    let prompt = server.llm.last_prompt().unwrap();
    assert!(!prompt.contains("Human: q1\n"));
    assert!(prompt.contains("Chat History:\nHuman: q2\nAI: a2\n"));
    assert!(prompt.ends_with("AI: a6\nHuman: q7\nAI:"));
    server.stop().await;
}

#[tokio::test]
async fn e2e_generation_failure_is_bad_gateway() {
    let server = common::spawn_server(MockLlm::failing("quota exceeded")).await;
    let client = common::session_client();
    let (status, body) = common::ask(&client, &server, "q").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
    server.stop().await;
}

/// **Scenario**: A slow model past the generation timeout → 504.
#[tokio::test]
async fn e2e_generation_timeout_is_gateway_timeout() {
    let server = common::spawn_server_configured(
        MockLlm::with_answer("late").with_delay(Duration::from_secs(5)),
        Arc::new(common::PlainTextExtractor),
        |config| config.generation_timeout = Some(Duration::from_millis(100)),
    )
    .await;
    let client = common::session_client();
    let (status, body) = common::ask(&client, &server, "slow?").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
    server.stop().await;
}
