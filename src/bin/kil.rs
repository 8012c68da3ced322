use clap::Parser;
use tracing_subscriber::EnvFilter;

use killedinlocalhost::cli::{utils::output_error, Cli, OutputFormat};
use killedinlocalhost::client::ClientError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = killedinlocalhost::cli::run(cli).await {
        match output_format {
            OutputFormat::Json => {
                let status = e.downcast_ref::<ClientError>().and_then(ClientError::status);
                output_error(&output_format, &e.to_string(), status)?;
            }
            OutputFormat::Text => match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}
