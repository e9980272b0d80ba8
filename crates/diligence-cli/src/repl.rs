//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::cli::{LookupArgs, SearchArgs};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use diligence_sdk::{DiligenceClient, SearchState};
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::path::PathBuf;

/// Run the interactive REPL.
///
/// The last search is kept between commands so `opinion` can follow `search`.
pub async fn run_repl(
    client: &DiligenceClient,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("Diligence REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!("{}", formatter.info(&format!("Server: {}", client.server_url())));
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(config.settings.history_size)
        .map_err(|e| CliError::Editor(e.to_string()))?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)
        .map_err(|e| CliError::Editor(format!("Failed to initialize editor: {}", e)))?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut state = SearchState::default();

    loop {
        match editor.readline("diligence> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, client, &mut state, formatter).await
                        {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Search { identifier: String },
    Opinion,
    Lookup { source: String, identifier: String },
    Show,
    Status,
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "search" => {
            if parts.len() < 2 {
                return Err(CliError::InvalidInput("Usage: search <cnpj|cpf>".to_string()));
            }
            // Masked input may contain spaces
            Ok(ReplCommand::Search {
                identifier: parts[1..].join(""),
            })
        }
        "opinion" => Ok(ReplCommand::Opinion),
        "lookup" => {
            if parts.len() < 3 {
                return Err(CliError::InvalidInput(
                    "Usage: lookup <ceis|cnep|cepim|leniencia> <cnpj|cpf>".to_string(),
                ));
            }
            Ok(ReplCommand::Lookup {
                source: parts[1].to_string(),
                identifier: parts[2..].join(""),
            })
        }
        "show" => Ok(ReplCommand::Show),
        "status" => Ok(ReplCommand::Status),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: ReplCommand,
    client: &DiligenceClient,
    state: &mut SearchState,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Search { identifier } => {
            let args = SearchArgs {
                identifier,
                opinion: false,
            };
            commands::execute_search(args, client, state, formatter).await?;
        }
        ReplCommand::Opinion => {
            client.run_opinion(state).await?;
            println!("{}", commands::render_search(state, formatter)?);
        }
        ReplCommand::Lookup { source, identifier } => {
            commands::execute_lookup(LookupArgs { source, identifier }, client, formatter).await?;
        }
        ReplCommand::Show => {
            println!("{}", commands::render_search(state, formatter)?);
        }
        ReplCommand::Status => {
            commands::execute_status(client, formatter).await?;
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  search <cnpj|cpf>              - Search all four sanctions lists");
    println!("  opinion                        - Consolidated opinion for the last search");
    println!("  lookup <source> <cnpj|cpf>     - Query one list (ceis|cnep|cepim|leniencia)");
    println!("  show                           - Show the last search again");
    println!("  status                         - Server health and credential status");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        assert_eq!(
            parse_repl_command("search 11.222.333/0001-81").unwrap(),
            ReplCommand::Search {
                identifier: "11.222.333/0001-81".to_string()
            }
        );
        assert!(parse_repl_command("search").is_err());
    }

    #[test]
    fn test_parse_lookup() {
        assert_eq!(
            parse_repl_command("lookup cepim 11222333000181").unwrap(),
            ReplCommand::Lookup {
                source: "cepim".to_string(),
                identifier: "11222333000181".to_string()
            }
        );
        assert!(parse_repl_command("lookup cepim").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_repl_command("opinion").unwrap(), ReplCommand::Opinion);
        assert_eq!(parse_repl_command("q").unwrap(), ReplCommand::Exit);
        assert_eq!(parse_repl_command("?").unwrap(), ReplCommand::Help);
        assert_eq!(parse_repl_command("status").unwrap(), ReplCommand::Status);
        assert!(parse_repl_command("assert x y z").is_err());
    }
}
