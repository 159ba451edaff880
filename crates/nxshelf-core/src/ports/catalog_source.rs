//! Remote catalog source port definition.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CatalogTitle, TitleDetail, TitleId};

/// Errors from catalog source operations.
///
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network or connectivity error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The payload could not be decoded as a whole.
    #[error("Invalid catalog data: {message}")]
    Parse { message: String },

    /// The remote has no record for this title.
    #[error("Title not found: {id}")]
    NotFound { id: String },
}

/// Port for fetching catalog data from the remote source.
#[async_trait]
pub trait CatalogSourcePort: Send + Sync {
    /// Fetch the full title list. Malformed records are skipped.
    async fn fetch_titles(&self) -> Result<Vec<CatalogTitle>, CatalogError>;

    /// Fetch the release-date table. Malformed lines are skipped.
    async fn fetch_release_dates(&self) -> Result<HashMap<TitleId, NaiveDate>, CatalogError>;

    /// Fetch extended metadata for one title.
    async fn fetch_detail(&self, id: &TitleId) -> Result<TitleDetail, CatalogError>;
}
