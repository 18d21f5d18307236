//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Automatically create Toggl time entries on a cron schedule.
#[derive(Debug, Parser)]
#[command(name = "tgl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the scheduler, or fire every schedule immediately with --once.
    Run {
        /// Create time entries immediately and exit.
        #[arg(long)]
        once: bool,
    },

    /// Show current configuration and scheduled entries.
    Status,

    /// List active projects in the configured workspace.
    Projects,

    /// List tasks for a project.
    Tasks {
        /// Project to list tasks for.
        #[arg(long)]
        project_id: i64,
    },

    /// Verify the API token and show account info.
    Whoami,
}
