use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use httpmock::MockServer;

use smartflex_admin::config::AppConfig;
use smartflex_admin::session::Session;
use smartflex_admin::{app, AppState};

/// One in-process console instance paired with a mock upstream backend.
/// Each test spawns its own pair for isolation.
pub struct TestServer {
    pub base_url: String,
    pub backend: MockServer,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let backend = MockServer::start_async().await;

        let mut config = AppConfig::development();
        config.backend.base_url = backend.base_url();

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let router = app(AppState::new(config));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            backend,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&self.base_url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        anyhow::bail!("server did not become ready on {}", self.base_url)
    }

    /// `Cookie` header value carrying a valid session with the given role.
    pub fn session_cookie(&self, role: &str) -> String {
        let session = Session::new("test-token", "testuser", role);
        format!("smartflex_session={}", session.encode())
    }
}
