//! Title repository port definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{CatalogQuery, CatalogTitle, TitleId, TitlePage};

/// Port for the local title catalog.
#[async_trait]
pub trait TitleRepository: Send + Sync {
    /// Replace the whole catalog. Readers see either the old or the new set.
    async fn replace_all(&self, titles: &[CatalogTitle]) -> Result<(), RepositoryError>;

    /// Look up one title.
    async fn get(&self, id: &TitleId) -> Result<Option<CatalogTitle>, RepositoryError>;

    /// Filtered, sorted page.
    async fn page(&self, query: &CatalogQuery) -> Result<TitlePage, RepositoryError>;

    /// Every title that groups under `base_id`, base first, then by id.
    async fn related(&self, base_id: &TitleId) -> Result<Vec<CatalogTitle>, RepositoryError>;

    /// Number of titles stored.
    async fn count(&self) -> Result<u64, RepositoryError>;
}
