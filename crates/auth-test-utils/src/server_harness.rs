//! Test server harness for E2E testing
//!
//! Provides TestAuthServer for spawning real service instances in tests.

use crate::fixtures::{test_config, MemoryAccountStore};
use auth_service::config::Config;
use auth_service::handlers::auth_handler::AppState;
use auth_service::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the authentication service in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_login_e2e() -> Result<(), anyhow::Error> {
///     let store = MemoryAccountStore::new();
///     seed_account(&store, "a@x.com", "Ann", "secret").await;
///     let server = TestAuthServer::spawn(store).await?;
///
///     let response = reqwest::Client::new()
///         .post(format!("{}/api/login", server.url()))
///         .json(&login_body)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a test server over the given in-memory store.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Use the deterministic test keys from `fixtures`
    /// - Serve HTTP in the background until dropped
    pub async fn spawn(store: MemoryAccountStore) -> Result<Self, anyhow::Error> {
        Self::spawn_with_config(store, test_config()).await
    }

    /// Spawn with explicit configuration (e.g. a short lookup timeout).
    pub async fn spawn_with_config(
        store: MemoryAccountStore,
        config: Config,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState {
            store: Arc::new(store),
            config: config.clone(),
        });

        // The process-wide recorder can only be installed once; later spawns
        // in the same test binary fall back to a standalone recorder.
        let metrics_handle = match routes::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let recorder = PrometheusBuilder::new().build_recorder();
                recorder.handle()
            }
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        // Stop the background server as soon as the test is done with it
        self._handle.abort();
    }
}
