//! Wishlist service.

use std::sync::Arc;

use crate::domain::{TitleId, WishlistEntry};
use crate::ports::{CoreError, RepositoryError, TitleRepository, WishlistRepository};

/// Service for wishlist operations.
///
/// Entries must refer to titles in the local catalog.
pub struct WishlistService {
    wishlist: Arc<dyn WishlistRepository>,
    titles: Arc<dyn TitleRepository>,
}

impl WishlistService {
    pub fn new(wishlist: Arc<dyn WishlistRepository>, titles: Arc<dyn TitleRepository>) -> Self {
        Self { wishlist, titles }
    }

    /// Add a catalog title. Returns `false` if it was already listed.
    pub async fn add(&self, id: &TitleId) -> Result<bool, CoreError> {
        let title = self
            .titles
            .get(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("title {id}")))?;
        let added = self
            .wishlist
            .add(&WishlistEntry::new(title.id, title.name))
            .await?;
        tracing::debug!(target: "nxshelf.wishlist", %id, added, "Wishlist add");
        Ok(added)
    }

    /// Remove a title. Returns `false` if it was not listed.
    pub async fn remove(&self, id: &TitleId) -> Result<bool, CoreError> {
        Ok(self.wishlist.remove(id).await?)
    }

    pub async fn contains(&self, id: &TitleId) -> Result<bool, CoreError> {
        Ok(self.wishlist.contains(id).await?)
    }

    /// Entries, most recently added first.
    pub async fn list(&self) -> Result<Vec<WishlistEntry>, CoreError> {
        Ok(self.wishlist.list().await?)
    }
}
