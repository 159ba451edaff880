//! Wishlist repository port definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{TitleId, WishlistEntry};

/// Port for the wishlist.
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// Add an entry. Returns `false` if the title was already listed.
    async fn add(&self, entry: &WishlistEntry) -> Result<bool, RepositoryError>;

    /// Remove an entry. Returns `false` if the title was not listed.
    async fn remove(&self, id: &TitleId) -> Result<bool, RepositoryError>;

    async fn contains(&self, id: &TitleId) -> Result<bool, RepositoryError>;

    /// All entries, most recently added first.
    async fn list(&self) -> Result<Vec<WishlistEntry>, RepositoryError>;
}
