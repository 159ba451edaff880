//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics.

use anyhow::Result;
use nxshelf_core::ResolvedPaths;

use crate::error::CliError;

/// Print every resolved path. Does not open the database.
pub fn execute() -> Result<()> {
    let paths = ResolvedPaths::resolve().map_err(CliError::from)?;
    println!("{paths}");
    Ok(())
}
