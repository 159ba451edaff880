//! Catalog client for the title list, release dates and detail API.

use std::collections::HashMap;

use chrono::NaiveDate;
use nxshelf_core::{CatalogTitle, TitleDetail, TitleId};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::ClientResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::parsing::{parse_release_dates, parse_titles};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default catalog client using the reqwest HTTP backend.
pub type DefaultCatalogClient = CatalogClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the remote catalog.
///
/// Generic over the HTTP backend so tests can inject canned responses.
/// Production code uses [`DefaultCatalogClient`] through `CatalogSourcePort`.
pub struct CatalogClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: CatalogClientConfig,
}

impl DefaultCatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogClientConfig) -> ClientResult<Self> {
        let backend = ReqwestBackend::new(&config)?;
        Ok(Self { backend, config })
    }
}

impl<B: HttpBackend> CatalogClient<B> {
    /// Create a client over a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: CatalogClientConfig, backend: B) -> Self {
        Self { backend, config }
    }

    pub(crate) async fn titles(&self) -> ClientResult<Vec<CatalogTitle>> {
        let url = Url::parse(&self.config.titles_url)?;
        let json: serde_json::Value = self.backend.get_json(&url).await?;
        let titles = parse_titles(&json)?;
        tracing::debug!(target: "nxshelf.catalog", count = titles.len(), url = %url, "Fetched title list");
        Ok(titles)
    }

    pub(crate) async fn release_dates(&self) -> ClientResult<HashMap<TitleId, NaiveDate>> {
        let url = Url::parse(&self.config.release_dates_url)?;
        let text = self.backend.get_text(&url).await?;
        let dates = parse_release_dates(&text);
        tracing::debug!(target: "nxshelf.catalog", count = dates.len(), url = %url, "Fetched release dates");
        Ok(dates)
    }

    pub(crate) async fn detail(&self, id: &TitleId) -> ClientResult<TitleDetail> {
        let url = detail_url(&self.config.api_base, id)?;
        self.backend.get_json(&url).await
    }
}

fn detail_url(api_base: &str, id: &TitleId) -> ClientResult<Url> {
    Ok(Url::parse(&format!("{}/{id}", api_base.trim_end_matches('/')))?)
}
