//! Lookup command implementation.

use crate::cli::LookupArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use diligence_domain::{Identifier, RegistrySource};
use diligence_sdk::DiligenceClient;

/// Execute the lookup command against one sanctions list.
pub async fn execute_lookup(
    args: LookupArgs,
    client: &DiligenceClient,
    formatter: &Formatter,
) -> Result<()> {
    let source: RegistrySource = args
        .source
        .parse()
        .map_err(|e: diligence_domain::UnknownSource| CliError::InvalidInput(e.to_string()))?;
    let identifier = Identifier::parse(&args.identifier)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let envelope = client.lookup(source, &identifier).await?;
    println!("{}", formatter.format_envelope(&envelope)?);

    Ok(())
}
