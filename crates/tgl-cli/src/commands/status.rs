//! Status command for showing the loaded configuration.

use std::io::Write;

use anyhow::Result;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    writeln!(
        writer,
        "Workspace: {} (ID: {})",
        config.workspace_name, config.workspace_id
    )?;
    writeln!(writer, "Schedules: {}", config.schedules.len())?;

    if config.schedules.is_empty() {
        writeln!(
            writer,
            "No schedules configured. Add [[schedules]] entries to the config file."
        )?;
        return Ok(());
    }

    for (index, schedule) in config.schedules.iter().enumerate() {
        let task = schedule.task_name.as_deref().unwrap_or("-");
        writeln!(
            writer,
            "{}. {:?} -> {} / {} ({}, billable: {}, start: {}, cron: {})",
            index + 1,
            schedule.description,
            schedule.project_name,
            task,
            schedule.duration,
            schedule.billable,
            schedule.start_hour,
            schedule.cron
        )?;
    }

    Ok(())
}
