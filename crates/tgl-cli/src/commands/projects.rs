//! Projects command for listing active projects in the workspace.

use std::io::Write;

use anyhow::{Context, Result};

use crate::Config;

pub async fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let client =
        tgl_toggl::Client::new(&config.api_token).context("failed to build Toggl client")?;
    let projects = client
        .projects(config.workspace_id)
        .await
        .context("failed to fetch projects")?;

    if projects.is_empty() {
        writeln!(writer, "No active projects found in this workspace.")?;
        return Ok(());
    }

    writeln!(writer, "{:>12}  {}", "ID", "NAME")?;
    for project in projects {
        writeln!(writer, "{:>12}  {}", project.id, project.name)?;
    }

    Ok(())
}
