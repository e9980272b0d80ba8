//! Diligence Server CLI
//!
//! Starts the HTTP server for registry lookups and compliance analysis.

use clap::Parser;
use diligence_server::{config::ServerConfig, start_server, ServerError};
use std::path::PathBuf;
use std::process;

/// Diligence Server - sanctions-registry lookups with LLM risk opinions
#[derive(Debug, Parser)]
#[command(name = "diligence-server")]
#[command(version, about, long_about = None)]
#[command(after_help = "\
CONFIGURATION:
    The TOML config file may contain:
    - bind_address / bind_port
    - [registry] base_url, timeout_secs
    - [completion] base_url, model, temperature, max_tokens, timeout_secs

    API keys are read from PORTAL_API_KEY and OPENAI_API_KEY.")]
struct Args {
    /// Load configuration from TOML file
    #[arg(short, long, env = "DILIGENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args = Args::parse();

    let mut config = match args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env_overrides();

    if let Some(port) = args.port {
        config.bind_port = port;
    }

    start_server(config).await?;

    Ok(())
}
