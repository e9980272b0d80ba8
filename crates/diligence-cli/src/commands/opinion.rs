//! Opinion command implementation.

use crate::cli::{OpinionArgs, SearchArgs};
use crate::error::Result;
use crate::output::Formatter;
use diligence_sdk::{DiligenceClient, SearchState};

/// Execute the opinion command: a search followed by the consolidated opinion.
pub async fn execute_opinion(
    args: OpinionArgs,
    client: &DiligenceClient,
    state: &mut SearchState,
    formatter: &Formatter,
) -> Result<()> {
    let search = SearchArgs {
        identifier: args.identifier,
        opinion: true,
    };
    super::execute_search(search, client, state, formatter).await
}
