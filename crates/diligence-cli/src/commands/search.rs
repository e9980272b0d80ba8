//! Search command implementation.

use crate::cli::SearchArgs;
use crate::error::Result;
use crate::output::Formatter;
use diligence_sdk::{DiligenceClient, SearchState};

/// Execute the search command.
///
/// With `--opinion`, the consolidated opinion is rendered above the
/// per-source results.
pub async fn execute_search(
    args: SearchArgs,
    client: &DiligenceClient,
    state: &mut SearchState,
    formatter: &Formatter,
) -> Result<()> {
    client.run_search(state, &args.identifier).await?;

    if args.opinion && matches!(state, SearchState::Populated(_)) {
        client.run_opinion(state).await?;
    }

    println!("{}", render_search(state, formatter)?);
    Ok(())
}

/// Render the current search state.
///
/// Settled states render as one block (one document in JSON mode) with the
/// opinion, when present, ahead of the per-source results.
pub fn render_search(state: &SearchState, formatter: &Formatter) -> Result<String> {
    match state {
        SearchState::Idle => Ok(formatter.info("No search yet")),
        SearchState::Searching { input } => Ok(formatter.info(&format!("Searching {}...", input))),
        SearchState::OpinionRequested(_) => {
            Ok(formatter.info("Requesting consolidated opinion..."))
        }
        SearchState::Failed { reason } => formatter.format_failure(reason),
        SearchState::Empty(results) | SearchState::Populated(results) => {
            formatter.format_search(results, None)
        }
        SearchState::OpinionReady { results, opinion } => {
            formatter.format_search(results, Some(opinion.as_str()))
        }
    }
}
