//! Health and metrics endpoint tests for receipt-service.

mod common;

use common::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn health_check_reports_ok() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("health response is JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "receipt-service");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn metrics_endpoint_serves_prometheus_text() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to reach metrics endpoint");

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    app.cleanup().await;
}
