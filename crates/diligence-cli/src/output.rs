//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use diligence_domain::LookupEnvelope;
use diligence_sdk::{DisplayEntry, SearchResults, ServerHealth};
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Shown when every source failed
pub const NOT_FOUND_MESSAGE: &str = "Identifier not found in the transparency portal lists.";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a four-source search with its consolidated opinion, if one was requested.
    ///
    /// JSON output is a single document; the opinion rides in its `opinion` field.
    pub fn format_search(&self, results: &SearchResults, opinion: Option<&str>) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_results_json(results, opinion),
            OutputFormat::Table | OutputFormat::Quiet => {
                let mut out = String::new();
                if let Some(opinion) = opinion {
                    out.push_str(&self.format_opinion(opinion)?);
                    out.push('\n');
                }
                if self.format == OutputFormat::Table {
                    out.push_str(&self.format_results_table(results));
                } else {
                    out.push_str(&listed_tags(&results.entries()));
                }
                Ok(out)
            }
        }
    }

    /// Format a search that never reached the server.
    pub fn format_failure(&self, reason: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({ "error": reason }))?),
            OutputFormat::Table | OutputFormat::Quiet => Ok(self.error(reason)),
        }
    }

    /// Format a single-source lookup.
    pub fn format_envelope(&self, envelope: &LookupEnvelope) -> Result<String> {
        let entry = DisplayEntry::from_envelope(envelope.clone());
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(envelope)?),
            OutputFormat::Table => Ok(self.format_entries_table(&[entry])),
            OutputFormat::Quiet => Ok(listed_tags(&[entry])),
        }
    }

    /// Format the consolidated opinion.
    pub fn format_opinion(&self, opinion: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({ "opinion": opinion }))?),
            OutputFormat::Table => Ok(format!(
                "{}\n{}\n",
                self.colorize("Consolidated opinion", "magenta"),
                opinion
            )),
            OutputFormat::Quiet => Ok(opinion.to_string()),
        }
    }

    /// Format server health.
    pub fn format_health(&self, server_url: &str, health: &ServerHealth) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(health)?),
            OutputFormat::Quiet => Ok(health.status.clone()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Server", "Status", "Sources", "Registry key", "Completion key"]);
                builder.push_record([
                    server_url.to_string(),
                    health.status.clone(),
                    health.sources.to_string(),
                    yes_no(health.registry_configured).to_string(),
                    yes_no(health.completion_configured).to_string(),
                ]);
                Ok(self.finish_table(builder))
            }
        }
    }

    /// Message for a search where every source failed.
    pub fn not_found(&self) -> String {
        self.warning(NOT_FOUND_MESSAGE)
    }

    fn format_results_json(&self, results: &SearchResults, opinion: Option<&str>) -> Result<String> {
        let failures: Vec<_> = results
            .failures()
            .into_iter()
            .map(|(source, reason)| json!({ "api": source, "reason": reason }))
            .collect();

        let mut value = json!({
            "identifier": results.identifier(),
            "found": !results.is_empty(),
            "entries": results.entries(),
            "failures": failures,
        });
        if let Some(opinion) = opinion {
            value["opinion"] = json!(opinion);
        }

        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_results_table(&self, results: &SearchResults) -> String {
        if results.is_empty() {
            return self.not_found();
        }

        let mut out = format!(
            "Results for {}\n",
            self.colorize(&results.identifier().formatted(), "cyan")
        );
        out.push_str(&self.format_entries_table(&results.entries()));

        for (source, reason) in results.failures() {
            out.push_str(&self.warning(&format!("{} unavailable: {}", source, reason)));
            out.push('\n');
        }

        out
    }

    fn format_entries_table(&self, entries: &[DisplayEntry]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Source", "Status", "Records", "Checked at"]);

        for entry in entries {
            let status = if entry.is_listed() { "LISTED" } else { "not listed" };
            builder.push_record([
                entry.source().tag().to_string(),
                status.to_string(),
                entry.record_count().to_string(),
                entry.metadata().timestamp.clone(),
            ]);
        }

        let mut out = self.finish_table(builder);
        out.push('\n');

        for entry in entries {
            let heading = if entry.is_listed() {
                self.colorize(entry.source().tag(), "red")
            } else {
                self.colorize(entry.source().tag(), "green")
            };
            out.push_str(&format!("\n{}\n{}\n", heading, entry.summary()));
        }

        out
    }

    fn finish_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Tags of listed sources, one per line
fn listed_tags(entries: &[DisplayEntry]) -> String {
    entries
        .iter()
        .filter(|entry| entry.is_listed())
        .map(|entry| entry.source().tag())
        .collect::<Vec<_>>()
        .join("\n")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
