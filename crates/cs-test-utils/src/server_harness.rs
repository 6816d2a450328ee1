//! Test server harness for E2E testing
//!
//! Provides `TestConnectionServer` for spawning real Connection Service
//! instances in tests.

use common::secret::SecretString;
use connection_service::config::Config;
use connection_service::observability::metrics::init_metrics_recorder;
use connection_service::routes::{self, AppState};
use connection_service::services::{JwtTokenSigner, TokenSigner};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

/// Media server URL configured for test servers.
pub const TEST_SERVER_URL: &str = "wss://media.test.local";

/// API key configured for test servers.
pub const TEST_API_KEY: &str = "APItestkey0001";

/// API secret configured for test servers. Must never appear in a response.
pub const TEST_API_SECRET: &str = "cs-test-secret-0123456789abcdef";

/// Process-wide metrics handle.
///
/// The global recorder can only be installed once per process, so every
/// harness in a test binary shares it. If another recorder was installed
/// first, a detached handle is used instead.
fn metrics_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| {
            init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

/// Test harness for spawning Connection Service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_connection_details_e2e() -> Result<(), anyhow::Error> {
///     let server = TestConnectionServer::spawn().await?;
///
///     let response = reqwest::get(format!("{}/api/connection-details", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestConnectionServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestConnectionServer {
    /// Spawn a test server that signs real tokens with the test credentials.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        let config = test_config()?;
        let signer = Arc::new(JwtTokenSigner::from_config(&config));
        Self::start(config, signer).await
    }

    /// Spawn a test server using the given signer (typically a
    /// `MockTokenSigner`).
    pub async fn spawn_with_signer(signer: Arc<dyn TokenSigner>) -> Result<Self, anyhow::Error> {
        let config = test_config()?;
        Self::start(config, signer).await
    }

    async fn start(config: Config, signer: Arc<dyn TokenSigner>) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState {
            config: config.clone(),
            signer,
        });

        // Build routes using connection-service's real route builder
        let app = routes::build_routes(state, metrics_handle());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The API secret the server signs with, for verifying issued tokens.
    pub fn api_secret(&self) -> SecretString {
        self.config.api_secret.clone()
    }
}

impl Drop for TestConnectionServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

fn test_config() -> Result<Config, anyhow::Error> {
    let vars = HashMap::from([
        ("LIVEKIT_URL".to_string(), TEST_SERVER_URL.to_string()),
        ("LIVEKIT_API_KEY".to_string(), TEST_API_KEY.to_string()),
        ("LIVEKIT_API_SECRET".to_string(), TEST_API_SECRET.to_string()),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
    ]);

    Config::from_vars(&vars).map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))
}
