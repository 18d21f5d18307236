//! Run command: continuous scheduling, or immediate fire-once.

use std::future::Future;

use anyhow::{Context, Result};

use tgl_core::entry::TimeEntry;
use tgl_core::types::WorkspaceId;
use tgl_engine::{Engine, EntrySink, SubmitError};

use crate::Config;

/// Adapts the Toggl client to the engine's submission port.
struct TogglSink {
    client: tgl_toggl::Client,
}

impl EntrySink for TogglSink {
    fn create_entry(
        &self,
        workspace: WorkspaceId,
        entry: &TimeEntry,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send {
        async move {
            self.client
                .create_time_entry(workspace, entry)
                .await
                .map_err(|err| SubmitError::new(err.to_string()))
        }
    }
}

pub async fn run(config: &Config, once: bool) -> Result<()> {
    let client =
        tgl_toggl::Client::new(&config.api_token).context("failed to build Toggl client")?;
    let engine = Engine::new(
        config.schedules.clone(),
        config.workspace_id,
        TogglSink { client },
    )
    .context("add at least one [[schedules]] entry to the config file")?;

    if once {
        let report = engine.fire_once().await;
        for outcome in &report.outcomes {
            if outcome.outcome.is_completed() {
                println!("{}: done", outcome.description);
            } else {
                println!("{}: failed", outcome.description);
            }
        }
        if !report.all_succeeded() {
            anyhow::bail!(
                "{} of {} entries failed",
                report.failure_count(),
                report.outcomes.len()
            );
        }
        return Ok(());
    }

    println!("tgl is running. Scheduled entries:");
    for schedule in &config.schedules {
        println!(
            "  - {:?} -> {} ({}, cron: {})",
            schedule.description, schedule.project_name, schedule.duration, schedule.cron
        );
    }
    println!("Press Ctrl+C to stop.");

    engine.run(shutdown_signal()).await?;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(err) => {
            tracing::warn!(%err, "failed to install SIGTERM handler, using Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

/// Resolves on Ctrl+C.
#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
