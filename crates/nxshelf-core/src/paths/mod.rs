//! Path utilities for nxshelf data directories.
//!
//! - Data root (`NXSHELF_DATA_DIR` or the platform data directory)
//! - Database file
//! - Downloads and partial-file directories

mod database;
mod downloads;
mod error;
mod platform;
mod resolver;

#[cfg(test)]
mod test_utils;

pub use database::{DATABASE_FILE, database_path};
pub use downloads::{DOWNLOADS_DIR_ENV, downloads_dir, partial_dir};
pub use error::PathError;
pub use platform::{DATA_DIR_ENV, data_root, normalize_user_path};
pub use resolver::ResolvedPaths;
