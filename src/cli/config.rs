use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8787";

const SESSION_FILE: &str = "session.json";

/// Everything `kil` remembers between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSession {
    pub server_url: String,
    pub token: Option<String>,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl Default for CliSession {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            token: None,
            user_id: None,
            email: None,
            signed_in_at: None,
        }
    }
}

impl CliSession {
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_in(&mut self, token: String, user_id: Uuid, email: String) {
        self.token = Some(token);
        self.user_id = Some(user_id);
        self.email = Some(email);
        self.signed_in_at = Some(Utc::now());
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.user_id = None;
        self.email = None;
        self.signed_in_at = None;
    }

    /// Server for this invocation: the `--server` override, else the saved one.
    pub fn server<'a>(&'a self, server_override: Option<&'a str>) -> &'a str {
        server_override.unwrap_or(&self.server_url)
    }

    /// Client for the selected server, carrying the saved token if any.
    pub fn client(&self, server_override: Option<&str>) -> anyhow::Result<ApiClient> {
        let server = self.server(server_override);
        let client = ApiClient::new(server).with_context(|| format!("bad server url '{}'", server))?;
        Ok(match &self.token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        })
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("KIL_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("killedinlocalhost").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<CliSession> {
    let session_file = get_config_dir()?.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(CliSession::default());
    }

    let content = fs::read_to_string(&session_file)?;
    let session: CliSession = serde_json::from_str(&content)
        .with_context(|| format!("corrupt session file {}", session_file.display()))?;
    Ok(session)
}

pub fn save_session(session: &CliSession) -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join(SESSION_FILE);

    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}
