//! Classify command handler.

use anyhow::Result;
use nxshelf_core::{base_title_id, classify};

use crate::error::CliError;

/// Print the role and base title of each identifier.
///
/// Every identifier is reported; malformed ones are listed on stderr and
/// make the command fail once all have been processed.
pub fn execute(ids: &[String]) -> Result<()> {
    let mut rejected = Vec::new();

    for raw in ids {
        match describe(raw) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                eprintln!("{err}");
                rejected.push(raw.as_str());
            }
        }
    }

    if rejected.is_empty() {
        Ok(())
    } else {
        Err(CliError::Arguments(format!("malformed identifier(s): {}", rejected.join(", "))).into())
    }
}

fn describe(raw: &str) -> Result<String, CliError> {
    let role = classify(raw).map_err(|e| CliError::Arguments(e.to_string()))?;
    let base = base_title_id(raw).map_err(|e| CliError::Arguments(e.to_string()))?;
    Ok(format!("{raw:<18} {role:<7} base {base}"))
}
