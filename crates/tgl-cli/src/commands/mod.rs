//! CLI subcommand implementations.

pub mod projects;
pub mod run;
pub mod status;
pub mod tasks;
pub mod whoami;
