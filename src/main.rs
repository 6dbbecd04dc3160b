// ABOUTME: Entry point for the dockhand CLI application.
// ABOUTME: Parses arguments, resolves hosts and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use dockhand::config::Config;
use dockhand::error::Result;
use dockhand::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Normal
    });

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let config = Config::discover_or_default(&cwd)?;
    let hosts = commands::load_hosts(&config).await;

    let id = match &cli.command {
        Commands::Hosts => {
            commands::list_hosts(&hosts, output);
            return Ok(());
        }
        Commands::Inspect { id, .. }
        | Commands::Start { id }
        | Commands::Stop { id }
        | Commands::Rm { id, .. }
        | Commands::Volumes { id }
        | Commands::Networks { id } => id.clone(),
    };
    let service = commands::bind_service(&hosts, &cli.host, &id, &config)?;

    match cli.command {
        Commands::Hosts => Ok(()),
        Commands::Inspect { fresh, .. } => commands::inspect(&service, fresh, output).await,
        Commands::Start { .. } => commands::start(&service, output).await,
        Commands::Stop { .. } => commands::stop(&service, output).await,
        Commands::Rm { force, volumes, .. } => {
            commands::remove(&service, force, volumes, output).await
        }
        Commands::Volumes { .. } => commands::volumes(&service, output).await,
        Commands::Networks { .. } => commands::networks(&service, output).await,
    }
}
