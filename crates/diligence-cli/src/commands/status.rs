//! Status command implementation.

use crate::error::Result;
use crate::output::Formatter;
use diligence_sdk::DiligenceClient;

/// Execute the status command.
pub async fn execute_status(client: &DiligenceClient, formatter: &Formatter) -> Result<()> {
    let health = client.health().await?;
    println!("{}", formatter.format_health(client.server_url(), &health)?);

    if !health.is_healthy() {
        println!(
            "{}",
            formatter.warning("Server is missing credentials; lookups or analyses will fail")
        );
    }

    Ok(())
}
