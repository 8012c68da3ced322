pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "kil")]
#[command(about = "kil - command-line client for killedinlocalhost")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server URL for this invocation (overrides the saved one)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign up, sign in, and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse and manage projects")]
    Projects {
        #[command(subcommand)]
        cmd: commands::projects::ProjectCommands,
    },

    #[command(about = "Read and write comments on a project")]
    Comments {
        #[command(subcommand)]
        cmd: commands::comments::CommentCommands,
    },

    #[command(about = "Select the server and check its health")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = cli.server;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, server, output_format).await,
        Commands::Projects { cmd } => commands::projects::handle(cmd, server, output_format).await,
        Commands::Comments { cmd } => commands::comments::handle(cmd, server, output_format).await,
        Commands::Server { cmd } => commands::server::handle(cmd, server, output_format).await,
    }
}
