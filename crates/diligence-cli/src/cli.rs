//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Diligence CLI - Check CNPJ/CPF identifiers against the Portal da
/// Transparência sanctions lists.
#[derive(Debug, Parser)]
#[command(name = "diligence")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Lookup server URL (overrides the config file)
    #[arg(short, long, global = true, env = "DILIGENCE_SERVER_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (listed sources only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search all four sanctions lists
    Search(SearchArgs),

    /// Search, then request one consolidated opinion
    Opinion(OpinionArgs),

    /// Query a single sanctions list
    Lookup(LookupArgs),

    /// Show server health and credential status
    Status,

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// CNPJ or CPF, masked or digits only
    pub identifier: String,

    /// Also request the consolidated opinion
    #[arg(short, long)]
    pub opinion: bool,
}

/// Arguments for the opinion command.
#[derive(Debug, Parser)]
pub struct OpinionArgs {
    /// CNPJ or CPF, masked or digits only
    pub identifier: String,
}

/// Arguments for the lookup command.
#[derive(Debug, Parser)]
pub struct LookupArgs {
    /// Sanctions list (ceis, cnep, cepim, leniencia)
    pub source: String,

    /// CNPJ or CPF, masked or digits only
    pub identifier: String,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
