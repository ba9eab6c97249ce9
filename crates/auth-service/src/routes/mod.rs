//! HTTP route table.

use crate::handlers::auth_handler::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Whole-request deadline; generous next to the account-lookup bound.
const REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Install the process-wide Prometheus recorder.
///
/// Fails if a recorder is already installed; test harnesses fall back to a
/// standalone recorder in that case.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    Router::new()
        // Authentication endpoints
        .route("/api/login", post(auth_handler::handle_login))
        .route("/api/signup", post(auth_handler::handle_signup))
        // Health check
        .route("/health", get(health_check))
        // Prometheus exposition
        .route(
            "/metrics",
            get(move || std::future::ready(metrics_handle.render())),
        )
        // Tracing middleware and a coarse request deadline
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            REQUEST_TIMEOUT_SECONDS,
        )))
        // Browser clients call this API cross-origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use auth_test_utils::{test_config, MemoryAccountStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = Arc::new(AppState {
            store: Arc::new(MemoryAccountStore::new()),
            config: test_config(),
        });
        // Standalone recorder; the global one may belong to another test
        let handle = PrometheusBuilder::new().build_recorder().handle();
        build_routes(state, handle)
    }

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_metrics_endpoint_renders() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_rejects_get() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
