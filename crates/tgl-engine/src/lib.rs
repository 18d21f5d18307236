//! Schedule execution engine.
//!
//! Owns the registered cron triggers and drives entry creation in two
//! modes: fire-once (immediate, all schedules, in declaration order) and
//! continuous (trigger-driven, indefinite, until shutdown). Failures are
//! isolated per schedule — one slow or failing submission never blocks a
//! sibling schedule or stops the trigger loop.

mod engine;
mod sink;
mod trigger;

pub use engine::{Engine, EngineError, FireOutcome, FireReport, ScheduleOutcome};
pub use sink::{EntrySink, SubmitError};
pub use trigger::{TriggerCallback, TriggerId, TriggerSet};
