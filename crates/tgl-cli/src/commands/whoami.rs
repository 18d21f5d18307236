//! Whoami command for verifying the API token.

use std::io::Write;

use anyhow::{Context, Result};

use crate::Config;

pub async fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let client =
        tgl_toggl::Client::new(&config.api_token).context("failed to build Toggl client")?;
    let me = client
        .me()
        .await
        .context("failed to authenticate, check your API token")?;

    writeln!(writer, "Authenticated as {} ({})", me.fullname, me.email)?;
    writeln!(writer, "Default workspace: {}", me.default_workspace_id)?;
    Ok(())
}
