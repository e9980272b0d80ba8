//! Diligence CLI library.
//!
//! Terminal front end for the lookup server: one-shot searches, the
//! consolidated opinion, and an interactive REPL, with configurable output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
