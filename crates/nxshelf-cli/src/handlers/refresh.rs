//! Refresh command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Replace the local catalog with the remote title list and release dates.
///
/// Nothing local changes unless both documents were fetched.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    println!("Fetching catalog...");
    let summary = ctx
        .app()
        .catalog()
        .refresh()
        .await
        .map_err(CliError::from)?;

    println!(
        "Catalog refreshed: {} title(s), {} with a release date.",
        summary.stored, summary.dated
    );
    Ok(())
}
