//! User-configured schedule records.

use serde::{Deserialize, Serialize};

use crate::cron::CronExpr;
use crate::duration::DurationSpec;
use crate::types::{ProjectId, StartHour, TaskId};

/// One user-configured rule: what entry to create and when.
///
/// Every field is validated as the record deserializes — a malformed
/// duration, cron expression, or start hour rejects the whole record — so
/// a `Schedule` in hand is always fully specified. The engine treats the
/// loaded schedule list as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Project display name, kept for logs and status output.
    #[serde(rename = "project")]
    pub project_name: String,

    /// Project the produced entries are filed under.
    pub project_id: ProjectId,

    /// Task display name, when the project uses tasks.
    #[serde(rename = "task", default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,

    /// Task the produced entries are filed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,

    /// Free-text label attached to every produced entry.
    pub description: String,

    /// How long each produced entry lasts.
    pub duration: DurationSpec,

    /// Copied verbatim into every produced entry.
    pub billable: bool,

    /// When the schedule fires.
    pub cron: CronExpr,

    /// Hour of day the produced entry starts at.
    pub start_hour: StartHour,
}
