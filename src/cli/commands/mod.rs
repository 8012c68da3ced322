pub mod auth;
pub mod comments;
pub mod projects;
pub mod server;

use crate::cli::config::{load_session, CliSession};
use crate::client::ApiClient;

/// Saved session plus a client for it; fails early when nobody is signed in.
pub(crate) fn signed_in_client(server: Option<&str>) -> anyhow::Result<(CliSession, ApiClient)> {
    let session = load_session()?;
    if !session.is_signed_in() {
        anyhow::bail!("Not signed in. Run `kil auth signin <email> --password <password>` first");
    }
    let client = session.client(server)?;
    Ok((session, client))
}
