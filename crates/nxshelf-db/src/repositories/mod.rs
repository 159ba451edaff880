//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod sqlite_title_repository;
mod sqlite_transfer_repository;
mod sqlite_wishlist_repository;

pub use sqlite_title_repository::SqliteTitleRepository;
pub use sqlite_transfer_repository::SqliteTransferRepository;
pub use sqlite_wishlist_repository::SqliteWishlistRepository;

use nxshelf_core::RepositoryError;

#[allow(clippy::needless_pass_by_value)]
fn storage_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

#[allow(clippy::needless_pass_by_value)]
fn column_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(format!("Column read error: {e}"))
}

/// `SQLite` integers are signed; clamp instead of wrapping.
fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
