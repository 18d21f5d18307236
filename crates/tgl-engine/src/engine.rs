//! Execution coordinator for fire-once and continuous modes.

use std::future::Future;
use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use tgl_core::cron::CronParseError;
use tgl_core::entry::synthesize;
use tgl_core::schedule::Schedule;
use tgl_core::types::WorkspaceId;

use crate::sink::{EntrySink, SubmitError};
use crate::trigger::{TriggerCallback, TriggerSet};

/// Errors that prevent the engine from starting.
///
/// Per-fire submission failures are not here on purpose: they are reported
/// in fire outcomes and logs, never raised as engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configured schedule list was empty.
    #[error("no schedules configured")]
    NoSchedulesConfigured,

    /// A schedule's recurrence expression failed to register.
    ///
    /// Aborts continuous-mode startup entirely: refusing to start beats
    /// silently under-scheduling the configured entries.
    #[error("invalid cron expression for schedule {description:?}")]
    InvalidSchedule {
        description: String,
        #[source]
        source: CronParseError,
    },
}

/// What happened to a single schedule's fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// The entry was created.
    Completed,
    /// The remote call failed; nothing was retried.
    SubmissionFailed { cause: SubmitError },
}

impl FireOutcome {
    /// Reports whether the fire completed successfully.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// One schedule's outcome within a fire-once run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub description: String,
    pub outcome: FireOutcome,
}

/// Combined result of a fire-once run.
///
/// A fire-once run always executes every schedule; failures are recorded
/// here rather than aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireReport {
    pub outcomes: Vec<ScheduleOutcome>,
}

impl FireReport {
    /// Reports whether every schedule completed.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes
            .iter()
            .all(|schedule| schedule.outcome.is_completed())
    }

    /// Number of schedules whose submission failed.
    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|schedule| !schedule.outcome.is_completed())
            .count()
    }
}

/// Drives entry creation for a fixed schedule set.
///
/// The schedule list is read-only for the engine's lifetime; concurrent
/// fire callbacks share it without synchronization.
pub struct Engine<S> {
    schedules: Vec<Schedule>,
    workspace: WorkspaceId,
    sink: Arc<S>,
}

impl<S: EntrySink + 'static> Engine<S> {
    /// Creates an engine over a non-empty schedule list.
    pub fn new(
        schedules: Vec<Schedule>,
        workspace: WorkspaceId,
        sink: S,
    ) -> Result<Self, EngineError> {
        if schedules.is_empty() {
            return Err(EngineError::NoSchedulesConfigured);
        }
        Ok(Self {
            schedules,
            workspace,
            sink: Arc::new(sink),
        })
    }

    /// Executes every schedule immediately, in declaration order.
    ///
    /// A failure on one schedule never prevents the next from executing.
    pub async fn fire_once(&self) -> FireReport {
        let total = self.schedules.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, schedule) in self.schedules.iter().enumerate() {
            tracing::info!(
                index = index + 1,
                total,
                description = %schedule.description,
                project = %schedule.project_name,
                "creating entry"
            );
            let outcome = execute(self.sink.as_ref(), self.workspace, schedule).await;
            outcomes.push(ScheduleOutcome {
                description: schedule.description.clone(),
                outcome,
            });
        }
        FireReport { outcomes }
    }

    /// Runs trigger-driven until `shutdown` resolves.
    ///
    /// Registers every schedule first; any registration failure aborts
    /// before the timing loop starts. On shutdown the loop is stopped and
    /// in-flight fires are left to finish.
    pub async fn run(&self, shutdown: impl Future<Output = ()> + Send) -> Result<(), EngineError> {
        let mut triggers = TriggerSet::new();
        for schedule in &self.schedules {
            triggers
                .register(schedule.cron.as_str(), self.callback_for(schedule))
                .map_err(|source| EngineError::InvalidSchedule {
                    description: schedule.description.clone(),
                    source,
                })?;
            tracing::info!(
                description = %schedule.description,
                cron = %schedule.cron,
                duration = %schedule.duration,
                "schedule registered"
            );
        }

        triggers.start();
        shutdown.await;
        tracing::info!("shutting down");
        triggers.stop().await;
        Ok(())
    }

    fn callback_for(&self, schedule: &Schedule) -> TriggerCallback {
        let sink = Arc::clone(&self.sink);
        let schedule = schedule.clone();
        let workspace = self.workspace;
        Arc::new(move || {
            let sink = Arc::clone(&sink);
            let schedule = schedule.clone();
            Box::pin(async move {
                tracing::info!(description = %schedule.description, "schedule fired");
                execute(sink.as_ref(), workspace, &schedule).await;
            })
        })
    }
}

/// Synthesizes and submits the entry for one fire of one schedule.
async fn execute<S: EntrySink>(
    sink: &S,
    workspace: WorkspaceId,
    schedule: &Schedule,
) -> FireOutcome {
    let entry = synthesize(schedule, &Local::now(), workspace);
    match sink.create_entry(workspace, &entry).await {
        Ok(()) => {
            tracing::info!(description = %schedule.description, "entry created");
            FireOutcome::Completed
        }
        Err(cause) => {
            tracing::warn!(
                description = %schedule.description,
                %cause,
                "entry creation failed"
            );
            FireOutcome::SubmissionFailed { cause }
        }
    }
}
