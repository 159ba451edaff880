//! `CatalogSourcePort` implementation for [`CatalogClient`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use nxshelf_core::{CatalogError, CatalogSourcePort, CatalogTitle, TitleDetail, TitleId};

use crate::client::CatalogClient;
use crate::error::ClientError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ClientError` to core `CatalogError`.
///
/// `id` is set for per-title requests so a 404 can name what was missing.
fn map_error(err: ClientError, id: Option<&TitleId>) -> CatalogError {
    match err {
        ClientError::Status { status: 404, url } => CatalogError::NotFound {
            id: id.map_or(url, ToString::to_string),
        },
        ClientError::Status { status, url } => CatalogError::Network {
            message: format!("request failed with status {status}: {url}"),
        },
        ClientError::Network(e) => CatalogError::Network {
            message: e.to_string(),
        },
        ClientError::InvalidUrl(e) => CatalogError::Network {
            message: format!("invalid catalog URL: {e}"),
        },
        ClientError::InvalidResponse { message } => CatalogError::Parse { message },
        ClientError::JsonParse(e) => CatalogError::Parse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> CatalogSourcePort for CatalogClient<B> {
    async fn fetch_titles(&self) -> Result<Vec<CatalogTitle>, CatalogError> {
        self.titles().await.map_err(|e| map_error(e, None))
    }

    async fn fetch_release_dates(&self) -> Result<HashMap<TitleId, NaiveDate>, CatalogError> {
        self.release_dates().await.map_err(|e| map_error(e, None))
    }

    async fn fetch_detail(&self, id: &TitleId) -> Result<TitleDetail, CatalogError> {
        self.detail(id).await.map_err(|e| map_error(e, Some(id)))
    }
}
