//! Time entry synthesis from a schedule and a reference instant.

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;

use crate::schedule::Schedule;
use crate::types::{ProjectId, TaskId, WorkspaceId};

/// Label attached to every entry this tool creates.
pub const CREATED_WITH: &str = "tgl";

/// A fully-populated time entry, shaped to match the Toggl v9
/// `time_entries` payload.
///
/// Entries are created fresh on every fire, handed to the submission port,
/// and discarded — nothing buffers or retries them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntry {
    pub billable: bool,
    pub created_with: String,
    pub description: String,
    /// Duration in whole seconds.
    pub duration: i64,
    pub project_id: ProjectId,
    /// RFC 3339 start timestamp carrying the local offset.
    pub start: DateTime<FixedOffset>,
    /// Omitted from the wire when the schedule has no task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub workspace_id: WorkspaceId,
}

/// Builds the entry a schedule produces when fired at `reference`.
///
/// The start timestamp is the calendar date of `reference`, in the
/// reference's own time zone, combined with the schedule's start hour: a
/// schedule fired at 17:00 with a start hour of 8 reports 08:00 on the
/// same day. Pure function of its inputs.
pub fn synthesize<Tz: TimeZone>(
    schedule: &Schedule,
    reference: &DateTime<Tz>,
    workspace: WorkspaceId,
) -> TimeEntry {
    let start_of_hour = reference
        .date_naive()
        .and_hms_opt(u32::from(schedule.start_hour.get()), 0, 0)
        .and_then(|naive| reference.timezone().from_local_datetime(&naive).earliest());

    let start = match start_of_hour {
        Some(at) => at.fixed_offset(),
        // The start hour fell into a DST gap; keep the fire instant.
        None => reference.clone().fixed_offset(),
    };

    TimeEntry {
        billable: schedule.billable,
        created_with: CREATED_WITH.to_string(),
        description: schedule.description.clone(),
        duration: schedule.duration.seconds(),
        project_id: schedule.project_id,
        start,
        task_id: schedule.task_id,
        workspace_id: workspace,
    }
}
