//! Core domain logic for the recurring time-entry scheduler.
//!
//! This crate contains the pure, I/O-free building blocks:
//! - Duration codec: human-readable durations ("8h30m") as whole seconds
//! - Cron expressions: five-field parsing and minute matching
//! - Entry synthesis: turning a schedule and a reference instant into a
//!   submittable time entry

pub mod cron;
pub mod duration;
pub mod entry;
pub mod schedule;
pub mod types;

pub use cron::{CronExpr, CronParseError};
pub use duration::{DurationSpec, InvalidDuration};
pub use entry::{CREATED_WITH, TimeEntry, synthesize};
pub use schedule::Schedule;
pub use types::{ProjectId, StartHour, TaskId, ValidationError, WorkspaceId};
