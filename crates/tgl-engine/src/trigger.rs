//! Cron trigger registration and the minute tick loop.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Local, Timelike};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use tgl_core::cron::{CronExpr, CronParseError};

/// Callback invoked when a trigger's expression matches the current minute.
///
/// Each invocation runs on its own task, so a slow callback cannot hold up
/// sibling triggers or the next tick evaluation.
pub type TriggerCallback =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Identifies a registered trigger within its set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerId(usize);

#[derive(Clone)]
struct Trigger {
    expr: CronExpr,
    callback: TriggerCallback,
}

/// A set of cron triggers sharing one timing loop.
///
/// Triggers are registered up front, then `start` spawns the loop. The set
/// is an owned value rather than process-global state, so tests can run
/// several sets side by side.
pub struct TriggerSet {
    triggers: Vec<Trigger>,
    running: Option<RunningLoop>,
}

struct RunningLoop {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TriggerSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self {
            triggers: Vec::new(),
            running: None,
        }
    }

    /// Registers a callback for a five-field cron expression.
    ///
    /// Fails when the expression does not parse. Registrations only take
    /// effect for loops started afterwards.
    pub fn register(
        &mut self,
        expr: &str,
        callback: TriggerCallback,
    ) -> Result<TriggerId, CronParseError> {
        let expr = expr.parse::<CronExpr>()?;
        self.triggers.push(Trigger { expr, callback });
        Ok(TriggerId(self.triggers.len() - 1))
    }

    /// Spawns the timing loop. Does nothing if the loop is already running.
    pub fn start(&mut self) {
        if self.running.is_some() {
            return;
        }
        let (shutdown, receiver) = watch::channel(false);
        let triggers = self.triggers.clone();
        let handle = tokio::spawn(run_loop(triggers, receiver));
        self.running = Some(RunningLoop { shutdown, handle });
    }

    /// Stops the timing loop and waits for it to exit.
    ///
    /// Idempotent. No new triggers fire after this returns; callbacks
    /// already dispatched keep running to completion.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let _ = running.shutdown.send(true);
        let _ = running.handle.await;
    }

    /// Reports whether the timing loop is running.
    pub const fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl Default for TriggerSet {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_loop(triggers: Vec<Trigger>, mut shutdown: watch::Receiver<bool>) {
    let mut target = next_minute(Local::now());
    loop {
        let wait = (target - Local::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        tokio::select! {
            () = tokio::time::sleep(wait) => {
                dispatch_due(&triggers, &target);
                target = advance_target(target, Local::now());
            }
            _ = shutdown.changed() => return,
        }
    }
}

/// Spawns one task per trigger whose expression matches `minute`.
fn dispatch_due(triggers: &[Trigger], minute: &DateTime<Local>) {
    for trigger in triggers {
        if trigger.expr.matches(minute) {
            tracing::debug!(expr = %trigger.expr, minute = %minute, "trigger due");
            let callback = Arc::clone(&trigger.callback);
            tokio::spawn(async move { callback().await });
        }
    }
}

/// The next minute to evaluate after firing `fired`.
///
/// Normally the minute right after `fired`. After a clock jump
/// (suspend/resume), the missed minutes are skipped rather than replayed.
fn advance_target(fired: DateTime<Local>, now: DateTime<Local>) -> DateTime<Local> {
    let next = fired + ChronoDuration::minutes(1);
    if now - next > ChronoDuration::minutes(1) {
        next_minute(now)
    } else {
        next
    }
}

/// The upcoming minute boundary strictly after `now`.
fn next_minute(now: DateTime<Local>) -> DateTime<Local> {
    let truncated = now
        .with_second(0)
        .and_then(|at| at.with_nanosecond(0))
        .unwrap_or(now);
    truncated + ChronoDuration::minutes(1)
}
