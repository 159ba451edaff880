//! Composition utilities for building `AppCore` with `SQLite` backends.

use sqlx::SqlitePool;
use std::sync::Arc;

use nxshelf_core::ports::{CatalogSourcePort, Repos};
use nxshelf_core::services::AppCore;

use crate::repositories::{
    SqliteTitleRepository, SqliteTransferRepository, SqliteWishlistRepository,
};

/// Factory for creating repository instances with `SQLite` backends.
///
/// Construction only, no domain logic.
pub struct CoreFactory;

impl CoreFactory {
    /// Build all `SQLite` repositories from a pool.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos::new(
            Arc::new(SqliteTitleRepository::new(pool.clone())),
            Arc::new(SqliteWishlistRepository::new(pool.clone())),
            Arc::new(SqliteTransferRepository::new(pool)),
        )
    }

    /// Build a complete `AppCore` from a pool and a catalog source.
    pub fn build_app_core(pool: SqlitePool, source: Arc<dyn CatalogSourcePort>) -> AppCore {
        AppCore::new(Self::build_repos(pool), source)
    }

    /// Create a transfer repository from a pool.
    ///
    /// The transfer controller is generic over its repository, so it takes
    /// the concrete type rather than the `Repos` trait object.
    pub fn transfer_repository(pool: SqlitePool) -> Arc<SqliteTransferRepository> {
        Arc::new(SqliteTransferRepository::new(pool))
    }
}
