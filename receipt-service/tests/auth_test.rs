//! Registration and login tests for receipt-service.

mod common;

use common::TestApp;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn register_returns_sanitized_user() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let email = format!("owner-{}@example.com", Uuid::new_v4().simple());
    let response = client
        .post(format!("{}/auth/register", app.address))
        .json(&json!({
            "name": "Ada Lovelace",
            "email": email,
            "password": "a-strong-password",
            "business_name": "Ada's Shop",
            "address": "1 Lovelace Way",
            "phone": "+2348000000000",
            "website": "https://ada.example"
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("register response is JSON");
    assert_eq!(body["email"], email);
    assert_eq!(body["business_name"], "Ada's Shop");
    assert_eq!(body["selected_template"], "classic");
    assert!(body.get("password_hash").is_none(), "hash must never leak");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn duplicate_email_registration_conflicts() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let (email, _) = app.register_business(&client).await;

    let response = client
        .post(format!("{}/auth/register", app.address))
        .json(&json!({
            "name": "Imposter",
            "email": email,
            "password": "another-password",
            "business_name": "Copy Shop",
            "address": "2 Shadow Lane",
            "phone": "+2348111111111"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn short_password_is_rejected() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/auth/register", app.address))
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "short",
            "business_name": "Ada's Shop",
            "address": "1 Lovelace Way",
            "phone": "+2348000000000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let (email, _) = app.register_business(&client).await;

    let response = client
        .post(format!("{}/auth/login", app.address))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn login_with_unknown_email_is_unauthorized() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/auth/login", app.address))
        .json(&json!({ "email": "nobody@example.com", "password": "whatever-it-is" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn login_issues_a_bearer_token() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let token = app.register_and_login(&client).await;
    assert!(!token.is_empty());

    // The token opens the protected surface.
    let response = client
        .get(format!("{}/users/me", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(response.status(), 200);

    app.cleanup().await;
}
