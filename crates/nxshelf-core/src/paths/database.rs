//! Database path resolution.

use std::path::PathBuf;

use super::error::PathError;
use super::platform::data_root;

/// File name of the `SQLite` database inside the data root.
pub const DATABASE_FILE: &str = "nxshelf.db";

/// Get the path to the nxshelf database file.
pub fn database_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(DATABASE_FILE))
}
