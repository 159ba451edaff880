//! All resolved paths in one struct, for the `paths` command and tests.

use std::fmt;
use std::path::PathBuf;

use super::{PathError, data_root, database_path, downloads_dir, partial_dir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub data_root: PathBuf,
    pub database_path: PathBuf,
    pub downloads_dir: PathBuf,
    pub partial_dir: PathBuf,
}

impl ResolvedPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, PathError> {
        Ok(Self {
            data_root: data_root()?,
            database_path: database_path()?,
            downloads_dir: downloads_dir()?,
            partial_dir: partial_dir()?,
        })
    }
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data root:  {}", self.data_root.display())?;
        writeln!(f, "Database:   {}", self.database_path.display())?;
        writeln!(f, "Downloads:  {}", self.downloads_dir.display())?;
        write!(f, "Partial:    {}", self.partial_dir.display())
    }
}
