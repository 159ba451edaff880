//! HTTP backend abstraction for catalog requests.
//!
//! The production backend uses reqwest with retry for transient errors.
//! Tests swap in [`testing::FakeBackend`] with canned bodies.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::{ClientError, ClientResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Fetches catalog documents.
///
/// Implementation detail; external code goes through `CatalogSourcePort`.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch JSON from a URL and deserialize it.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ClientResult<T>;

    /// Fetch a URL as text.
    async fn get_text(&self, url: &Url) -> ClientResult<String>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production backend with exponential backoff for 5xx and network errors.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    pub fn new(config: &CatalogClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    async fn fetch_with_retry(&self, url: &Url) -> ClientResult<reqwest::Response> {
        let mut last_error: Option<ClientError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(u32::from(attempt) - 1);
                tracing::debug!(
                    target: "nxshelf.catalog",
                    url = %url,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Retrying catalog request"
                );
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url.as_str()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(ClientError::Status {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // 4xx or final attempt
                    return Err(ClientError::Status {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::InvalidResponse {
            message: "Unknown error during fetch".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> ClientResult<T> {
        // Decode via bytes so malformed bodies surface as JsonParse, not Network.
        let body = self.fetch_with_retry(url).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_text(&self, url: &Url) -> ClientResult<String> {
        let response = self.fetch_with_retry(url).await?;
        Ok(response.text().await?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reqwest_backend_creation() {
        let config = CatalogClientConfig::default().with_max_retries(1);
        let backend = ReqwestBackend::new(&config).unwrap();
        assert_eq!(backend.max_retries, 1);
        assert_eq!(backend.retry_base_delay, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_fake_backend_returns_canned_json() {
        let backend = FakeBackend::new()
            .with_response("working.json", CannedResponse::json(&json!({"a": 1})));

        let url = Url::parse("https://example.com/data/working.json").unwrap();
        let value: serde_json::Value = backend.get_json(&url).await.unwrap();

        assert_eq!(value["a"], 1);
        assert_eq!(backend.requests(), vec![url.to_string()]);
    }

    #[tokio::test]
    async fn test_fake_backend_unknown_url_is_404() {
        let backend = FakeBackend::new();
        let url = Url::parse("https://example.com/unknown").unwrap();

        let result = backend.get_text(&url).await;
        assert!(matches!(result, Err(ClientError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_fake_backend_bad_json_is_parse_error() {
        let backend =
            FakeBackend::new().with_response("bad", CannedResponse::text("{not json"));
        let url = Url::parse("https://example.com/bad").unwrap();

        let result: ClientResult<serde_json::Value> = backend.get_json(&url).await;
        assert!(matches!(result, Err(ClientError::JsonParse(_))));
    }
}
