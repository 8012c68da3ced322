#![allow(dead_code)]

pub mod router;

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory storage so the suite needs no Postgres
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_killedinlocalhost"));
        cmd.env("KIL_API_PORT", port.to_string())
            .env("API_BIND_ADDRESS", "127.0.0.1")
            .env("APP_ENV", "development")
            .env("STORAGE", "memory")
            .env("JWT_SECRET", "e2e-test-secret")
            .env("API_ENABLE_REQUEST_LOGGING", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Unique address per call so tests sharing one server never collide.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@localhost.dev", prefix, uuid::Uuid::new_v4().simple())
}
