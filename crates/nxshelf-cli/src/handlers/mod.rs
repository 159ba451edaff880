//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Parse and validate CLI input, call `AppCore` or the transfer
//!   controller, format output for the terminal
//!
//! They never touch repositories or the database directly.

pub mod classify;
pub mod list;
pub mod paths;
pub mod refresh;
pub mod show;
pub mod transfers;
pub mod wishlist;

use nxshelf_core::TitleId;

use crate::error::CliError;

/// Parse a user-supplied identifier, mapping failures to an argument error.
pub(crate) fn parse_title_id(raw: &str) -> Result<TitleId, CliError> {
    TitleId::parse(raw.trim()).map_err(|e| CliError::Arguments(e.to_string()))
}
