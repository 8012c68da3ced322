use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_session, save_session};
use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;
use crate::client::ApiClient;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health from the /health endpoint")]
    Health,

    #[command(about = "Switch to another server (signs out of the current one)")]
    Use {
        #[arg(help = "Server URL, e.g. http://localhost:8787")]
        url: String,
    },

    #[command(about = "Show the selected server")]
    Show,
}

pub async fn handle(cmd: ServerCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut session = load_session()?;

    match cmd {
        ServerCommands::Health => {
            let client = session.client(server.as_deref())?;
            let report = client.health().await?;
            match output_format {
                OutputFormat::Json => output_json(&report)?,
                OutputFormat::Text => println!(
                    "{}: {} (database: {})",
                    client.base_url(),
                    report.status,
                    report.database
                ),
            }
            if !report.is_ok() {
                anyhow::bail!("server is degraded");
            }
            Ok(())
        }
        ServerCommands::Use { url } => {
            // validate before saving
            let client = ApiClient::new(&url)?;
            let url = client.base_url().as_str().trim_end_matches('/').to_string();
            if url != session.server_url {
                // tokens are only valid on the server that issued them
                session.sign_out();
            }
            session.server_url = url.clone();
            save_session(&session)?;
            output_success(
                &output_format,
                &format!("Using server {}", url),
                Some(json!({ "server": url })),
            )
        }
        ServerCommands::Show => {
            let url = session.server(server.as_deref());
            match output_format {
                OutputFormat::Json => output_json(&json!({ "server": url })),
                OutputFormat::Text => {
                    println!("Current server: {}", url);
                    Ok(())
                }
            }
        }
    }
}
