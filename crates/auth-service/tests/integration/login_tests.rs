//! E2E tests for the login wire contract.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use auth_service::crypto;
use auth_test_utils::{
    seed_account, test_config_with_lookup_timeout, test_token_secret, MemoryAccountStore,
    TestAuthServer, TokenAssertions,
};
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;

/// Happy path: valid credentials return 200 with a verifiable session token.
#[tokio::test]
async fn test_login_valid_credentials_returns_token() -> Result<(), anyhow::Error> {
    // Arrange
    let store = MemoryAccountStore::new();
    seed_account(&store, "a@x.com", "Ann", "secret").await;
    let server = TestAuthServer::spawn(store).await?;

    // Act
    let response = reqwest::Client::new()
        .post(format!("{}/api/login", server.url()))
        .json(&json!({"email": "a@x.com", "password": "secret"}))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"].as_bool(), Some(true));

    let token = body["token"]
        .as_str()
        .expect("Response should include token")
        .to_string();
    token
        .assert_valid_session_token()
        .assert_success_claim()
        .assert_for_email("a@x.com")
        .assert_named("Ann")
        .assert_ttl_seconds(86_400);

    // The token verifies against the shared signing secret
    let claims = crypto::verify_session_token(&token, &test_token_secret())?;
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.name, "Ann");

    Ok(())
}

/// Password mismatch keeps the legacy error string and a 400 status.
#[tokio::test]
async fn test_login_wrong_password_returns_invalid_information() -> Result<(), anyhow::Error> {
    let store = MemoryAccountStore::new();
    seed_account(&store, "a@x.com", "Ann", "secret").await;
    let server = TestAuthServer::spawn(store).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/login", server.url()))
        .json(&json!({"email": "a@x.com", "password": "wrong"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(body["error"].as_str(), Some("invalid information"));

    Ok(())
}

/// Unknown account keeps the (distinct) legacy error string.
#[tokio::test]
async fn test_login_unknown_email_returns_invalid_info() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/login", server.url()))
        .json(&json!({"email": "nobody@x.com", "password": "x"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(body["error"].as_str(), Some("invalid info"));

    Ok(())
}

/// A body that is not JSON maps to a structured 400, not a crash.
#[tokio::test]
async fn test_login_malformed_body_returns_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/login", server.url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(body["error"].as_str(), Some("bad request"));

    Ok(())
}

/// A JSON body missing required fields is also a structured 400.
#[tokio::test]
async fn test_login_missing_fields_returns_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/login", server.url()))
        .json(&json!({"email": "a@x.com"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"].as_str(), Some("bad request"));

    Ok(())
}

/// Two successful logins return distinct tokens with the same payload
/// semantics.
#[tokio::test]
async fn test_login_repeated_calls_issue_distinct_tokens() -> Result<(), anyhow::Error> {
    let store = MemoryAccountStore::new();
    seed_account(&store, "a@x.com", "Ann", "secret").await;
    let server = TestAuthServer::spawn(store).await?;
    let client = reqwest::Client::new();

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let response = client
            .post(format!("{}/api/login", server.url()))
            .json(&json!({"email": "a@x.com", "password": "secret"}))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await?;
        tokens.push(
            body["token"]
                .as_str()
                .expect("Response should include token")
                .to_string(),
        );
    }

    assert_ne!(tokens[0], tokens[1]);
    for token in &tokens {
        let claims = crypto::verify_session_token(token, &test_token_secret())?;
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.name, "Ann");
    }

    Ok(())
}

/// A store that outlives the lookup bound surfaces as 503, a failure kind
/// distinct from the credential errors.
#[tokio::test]
async fn test_login_slow_store_returns_503() -> Result<(), anyhow::Error> {
    let store = MemoryAccountStore::with_delay(Duration::from_millis(200));
    seed_account(&store, "a@x.com", "Ann", "secret").await;
    let server = TestAuthServer::spawn_with_config(
        store,
        test_config_with_lookup_timeout(Duration::from_millis(20)),
    )
    .await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/login", server.url()))
        .json(&json!({"email": "a@x.com", "password": "secret"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(body["error"].as_str(), Some("account lookup timed out"));

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_get_method() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::get(format!("{}/api/login", server.url())).await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
