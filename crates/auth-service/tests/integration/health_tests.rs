//! E2E tests for service plumbing: health and metrics endpoints.

use auth_test_utils::{MemoryAccountStore, TestAuthServer};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_renders() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_404() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(MemoryAccountStore::new()).await?;

    let response = reqwest::get(format!("{}/api/unknown", server.url())).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
