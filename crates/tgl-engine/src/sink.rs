//! The port through which synthesized entries leave the engine.

use std::future::Future;

use thiserror::Error;

use tgl_core::entry::TimeEntry;
use tgl_core::types::WorkspaceId;

/// A remote submission attempt failed.
///
/// Carries only a rendered cause: the engine logs and reports the failure
/// but never inspects, retries, or buffers it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SubmitError {
    message: String,
}

impl SubmitError {
    /// Wraps a rendered failure cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Destination for synthesized time entries.
///
/// Implementations must tolerate concurrent calls: schedules matching the
/// same tick submit from independent tasks.
pub trait EntrySink: Send + Sync {
    /// Creates one time entry in the given workspace.
    fn create_entry(
        &self,
        workspace: WorkspaceId,
        entry: &TimeEntry,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send;
}
