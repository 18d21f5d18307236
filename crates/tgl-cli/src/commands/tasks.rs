//! Tasks command for listing a project's tasks.

use std::io::Write;

use anyhow::{Context, Result};

use tgl_core::types::ProjectId;

use crate::Config;

pub async fn run<W: Write>(writer: &mut W, config: &Config, project: ProjectId) -> Result<()> {
    let client =
        tgl_toggl::Client::new(&config.api_token).context("failed to build Toggl client")?;
    let tasks = client
        .tasks(config.workspace_id, project)
        .await
        .context("failed to fetch tasks")?;

    if tasks.is_empty() {
        writeln!(writer, "No tasks found for project {project}.")?;
        return Ok(());
    }

    writeln!(writer, "{:>12}  {:<30}  {}", "ID", "NAME", "ACTIVE")?;
    for task in tasks {
        writeln!(writer, "{:>12}  {:<30}  {}", task.id, task.name, task.active)?;
    }

    Ok(())
}
