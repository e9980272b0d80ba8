//! Diligence CLI - Sanctions-list lookups from the terminal.

use anyhow::Context;
use clap::Parser;
use diligence_cli::commands;
use diligence_cli::repl;
use diligence_cli::{Cli, Command, Config, Formatter};
use diligence_sdk::{DiligenceClient, SearchState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::load_or_init().context("loading configuration from ~/.diligence")?,
    };

    let server_url = cli.server.clone().unwrap_or_else(|| config.server_url.clone());
    let client = DiligenceClient::new(&server_url)
        .with_context(|| format!("creating client for {}", server_url))?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let mut state = SearchState::default();

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&client, &config, &formatter).await?;
        }
        Some(Command::Search(args)) => {
            commands::execute_search(args, &client, &mut state, &formatter).await?;
        }
        Some(Command::Opinion(args)) => {
            commands::execute_opinion(args, &client, &mut state, &formatter).await?;
        }
        Some(Command::Lookup(args)) => {
            commands::execute_lookup(args, &client, &formatter)
                .await
                .with_context(|| format!("lookup against {}", server_url))?;
        }
        Some(Command::Status) => {
            commands::execute_status(&client, &formatter)
                .await
                .with_context(|| format!("health check against {}", server_url))?;
        }
    }

    Ok(())
}
