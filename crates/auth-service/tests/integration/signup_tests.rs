//! E2E tests for the signup flow.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use auth_test_utils::{seed_account, MemoryAccountStore, TestAuthServer, TokenAssertions};
use reqwest::StatusCode;
use serde_json::json;

/// Happy path: a new account registers, then logs in through the unchanged
/// login path.
#[tokio::test]
async fn test_signup_then_login_round_trip() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;
    let client = reqwest::Client::new();

    // Act: register
    let response = client
        .post(format!("{}/api/signup", server.url()))
        .json(&json!({
            "email": "new@x.com",
            "password": "password123",
            "name": "New User"
        }))
        .send()
        .await?;

    // Assert: registration succeeded
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"].as_bool(), Some(true));

    // Act: log in with the new credentials
    let response = client
        .post(format!("{}/api/login", server.url()))
        .json(&json!({"email": "new@x.com", "password": "password123"}))
        .send()
        .await?;

    // Assert: login works and the token names the new account
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    let token = body["token"]
        .as_str()
        .expect("Response should include token")
        .to_string();
    token
        .assert_valid_session_token()
        .assert_for_email("new@x.com")
        .assert_named("New User");

    Ok(())
}

#[tokio::test]
async fn test_signup_duplicate_email_rejected() -> Result<(), anyhow::Error> {
    let store = MemoryAccountStore::new();
    seed_account(&store, "taken@x.com", "First", "password123").await;
    let server = TestAuthServer::spawn(store).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/signup", server.url()))
        .json(&json!({
            "email": "taken@x.com",
            "password": "otherpassword",
            "name": "Second"
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(body["error"].as_str(), Some("account already exists"));

    Ok(())
}

#[tokio::test]
async fn test_signup_invalid_email_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/signup", server.url()))
        .json(&json!({
            "email": "not-an-email",
            "password": "password123",
            "name": "User"
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(body["error"].as_str(), Some("invalid email address"));

    Ok(())
}

#[tokio::test]
async fn test_signup_short_password_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/signup", server.url()))
        .json(&json!({
            "email": "a@x.com",
            "password": "short",
            "name": "User"
        }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body["error"].as_str(),
        Some("password must be at least 8 characters")
    );

    Ok(())
}

#[tokio::test]
async fn test_signup_malformed_body_returns_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/signup", server.url()))
        .header("content-type", "application/json")
        .body("[not, even, close")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"].as_str(), Some("bad request"));

    Ok(())
}
