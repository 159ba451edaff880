//! Catalog service - refresh from the remote source, browse, group.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{CatalogQuery, CatalogTitle, TitleDetail, TitleId, TitlePage, TitleRole};
use crate::ports::{CatalogSourcePort, CoreError, TitleRepository};

/// Outcome of a catalog refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    /// Titles now in the local catalog.
    pub stored: usize,
    /// How many of those received a release date.
    pub dated: usize,
}

/// A base title together with its updates and add-on content.
#[derive(Debug, Clone, Serialize)]
pub struct TitleGroup {
    pub base_id: TitleId,
    /// The base entry, if the catalog has it.
    pub base: Option<CatalogTitle>,
    pub updates: Vec<CatalogTitle>,
    pub dlc: Vec<CatalogTitle>,
}

/// Service for catalog operations.
pub struct CatalogService {
    titles: Arc<dyn TitleRepository>,
    source: Arc<dyn CatalogSourcePort>,
}

impl CatalogService {
    pub fn new(titles: Arc<dyn TitleRepository>, source: Arc<dyn CatalogSourcePort>) -> Self {
        Self { titles, source }
    }

    /// Replace the local catalog with the remote one.
    ///
    /// Both remote documents are fetched before anything local is touched,
    /// so a failed refresh leaves the stored catalog as it was.
    pub async fn refresh(&self) -> Result<RefreshSummary, CoreError> {
        let mut titles = self.source.fetch_titles().await?;
        let dates = self.source.fetch_release_dates().await?;

        let mut dated = 0;
        for title in &mut titles {
            if let Some(date) = dates.get(&title.id) {
                title.release_date = Some(*date);
                dated += 1;
            }
        }

        self.titles.replace_all(&titles).await?;

        tracing::info!(
            target: "nxshelf.catalog",
            stored = titles.len(),
            dated,
            "Catalog refreshed"
        );
        Ok(RefreshSummary {
            stored: titles.len(),
            dated,
        })
    }

    /// One page of titles.
    pub async fn page(&self, query: &CatalogQuery) -> Result<TitlePage, CoreError> {
        Ok(self.titles.page(query).await?)
    }

    pub async fn get(&self, id: &TitleId) -> Result<Option<CatalogTitle>, CoreError> {
        Ok(self.titles.get(id).await?)
    }

    /// Number of titles stored locally.
    pub async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.titles.count().await?)
    }

    /// Group `id` with everything that shares its base title.
    pub async fn related(&self, id: &TitleId) -> Result<TitleGroup, CoreError> {
        let base_id = id.base();
        let members = self.titles.related(&base_id).await?;

        let mut group = TitleGroup {
            base_id,
            base: None,
            updates: Vec::new(),
            dlc: Vec::new(),
        };
        for title in members {
            match title.role() {
                TitleRole::Base => group.base = Some(title),
                TitleRole::Update => group.updates.push(title),
                TitleRole::Dlc => group.dlc.push(title),
            }
        }
        Ok(group)
    }

    /// Extended metadata from the remote detail API.
    pub async fn detail(&self, id: &TitleId) -> Result<TitleDetail, CoreError> {
        Ok(self.source.fetch_detail(id).await?)
    }
}
