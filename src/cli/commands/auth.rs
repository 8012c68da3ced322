use clap::Subcommand;
use serde_json::json;

use crate::api::{AuthResponse, SigninInput, SignupInput};
use crate::cli::config::{load_session, save_session, CliSession};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and sign in")]
    Signup {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (at least 6 characters)")]
        password: String,
        #[arg(long, help = "Display name")]
        name: Option<String>,
    },

    #[command(about = "Sign in to the current server")]
    Signin {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Forget the saved token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut session = load_session()?;

    match cmd {
        AuthCommands::Signup { email, password, name } => {
            let input = SignupInput { email, password, name };
            // same rules the server applies; saves a round trip
            input.validate()?;

            let mut client = session.client(server.as_deref())?;
            let auth = client.signup(&input).await?;
            remember(&mut session, server, &auth);
            save_session(&session)?;

            output_success(
                &output_format,
                &format!("Signed up as {}", auth.user.email),
                Some(json!({ "user": auth.user })),
            )
        }
        AuthCommands::Signin { email, password } => {
            let input = SigninInput { email, password };
            input.validate()?;

            let mut client = session.client(server.as_deref())?;
            let auth = client.signin(&input).await?;
            remember(&mut session, server, &auth);
            save_session(&session)?;

            output_success(
                &output_format,
                &format!("Signed in as {}", auth.user.email),
                Some(json!({ "user": auth.user })),
            )
        }
        AuthCommands::Logout => {
            session.sign_out();
            save_session(&session)?;
            output_success(&output_format, "Signed out", None)
        }
        AuthCommands::Status => {
            let server_url = session.server(server.as_deref()).to_string();
            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "server": server_url,
                            "signed_in": session.is_signed_in(),
                            "user_id": session.user_id,
                            "email": session.email,
                            "signed_in_at": session.signed_in_at,
                        }))?
                    );
                }
                OutputFormat::Text => match (&session.email, session.is_signed_in()) {
                    (Some(email), true) => println!("Signed in to {} as {}", server_url, email),
                    _ => println!("Not signed in ({})", server_url),
                },
            }
            Ok(())
        }
    }
}

/// An explicit `--server` on signin becomes the saved server.
fn remember(session: &mut CliSession, server: Option<String>, auth: &AuthResponse) {
    if let Some(server) = server {
        session.server_url = server;
    }
    session.sign_in(auth.token.clone(), auth.user.id, auth.user.email.clone());
}
