use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tgl_cli::commands::{projects, run, status, tasks, whoami};
use tgl_cli::{Cli, Commands, Config};

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Run { once }) => {
            let config = load_config(&cli)?;
            run::run(&config, *once).await?;
        }
        Some(Commands::Status) => {
            let config = load_config(&cli)?;
            status::run(&mut std::io::stdout(), &config)?;
        }
        Some(Commands::Projects) => {
            let config = load_config(&cli)?;
            projects::run(&mut std::io::stdout(), &config).await?;
        }
        Some(Commands::Tasks { project_id }) => {
            let config = load_config(&cli)?;
            tasks::run(
                &mut std::io::stdout(),
                &config,
                tgl_core::types::ProjectId::new(*project_id),
            )
            .await?;
        }
        Some(Commands::Whoami) => {
            let config = load_config(&cli)?;
            whoami::run(&mut std::io::stdout(), &config).await?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
