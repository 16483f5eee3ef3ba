//! Business profile and template tests for receipt-service.

mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn profile_requires_auth() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/users/me", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn profile_starts_with_defaults() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();
    let token = app.register_and_login(&client).await;

    let response = client
        .get(format!("{}/users/me", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("profile response is JSON");
    assert_eq!(body["business_name"], "Ada's Shop");
    assert_eq!(body["selected_template"], "classic");
    assert_eq!(body["vat_rate"], "0.00");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn profile_update_changes_only_supplied_fields() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();
    let token = app.register_and_login(&client).await;

    let response = client
        .patch(format!("{}/users/me", app.address))
        .bearer_auth(&token)
        .json(&json!({ "vat_rate": "7.5", "website": "https://new.example" }))
        .send()
        .await
        .expect("Failed to update profile");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("profile response is JSON");
    assert_eq!(body["vat_rate"], "7.50");
    assert_eq!(body["website"], "https://new.example");
    // Untouched fields keep their values.
    assert_eq!(body["business_name"], "Ada's Shop");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn out_of_range_vat_rate_is_rejected() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();
    let token = app.register_and_login(&client).await;

    let response = client
        .patch(format!("{}/users/me", app.address))
        .bearer_auth(&token)
        .json(&json!({ "vat_rate": "150" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn template_selection_is_persisted() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();
    let token = app.register_and_login(&client).await;

    let response = client
        .put(format!("{}/users/me/template", app.address))
        .bearer_auth(&token)
        .json(&json!({ "selected_template": "modern" }))
        .send()
        .await
        .expect("Failed to update template");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("template response is JSON");
    assert_eq!(body["selected_template"], "modern");

    // And it sticks on the next read.
    let response = client
        .get(format!("{}/users/me", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch profile");
    let body: Value = response.json().await.expect("profile response is JSON");
    assert_eq!(body["selected_template"], "modern");

    app.cleanup().await;
}
