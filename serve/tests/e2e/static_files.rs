use docchat::MockLlm;
use reqwest::StatusCode;

use super::common;

#[tokio::test]
async fn e2e_root_serves_index_html() {
    let server = common::spawn_server(MockLlm::with_answer("ok")).await;
    let resp = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("<title>docchat</title>"));
    server.stop().await;
}

#[tokio::test]
async fn e2e_static_assets_are_served() {
    let server = common::spawn_server(MockLlm::with_answer("ok")).await;
    let resp = reqwest::get(server.url("/static/app.js")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("docchat"));

    let missing = reqwest::get(server.url("/static/nope.js")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    server.stop().await;
}

#[tokio::test]
async fn e2e_health_reports_ok() {
    let server = common::spawn_server(MockLlm::with_answer("ok")).await;
    let resp = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    server.stop().await;
}
