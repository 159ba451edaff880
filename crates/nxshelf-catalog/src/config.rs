//! Public configuration for the catalog client.

use std::time::Duration;

use nxshelf_core::DEFAULT_ASSET_HOST;

/// Default location of the title list.
pub const DEFAULT_TITLES_URL: &str =
    "https://raw.githubusercontent.com/ghost-land/NX-Missing/main/data/working.json";

/// Default location of the release-date table.
pub const DEFAULT_RELEASE_DATES_URL: &str =
    "https://raw.githubusercontent.com/ghost-land/NX-Missing/main/data/titles_db.txt";

/// Configuration for the catalog client.
///
/// # Example
///
/// ```
/// use nxshelf_catalog::CatalogClientConfig;
/// use std::time::Duration;
///
/// let config = CatalogClientConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_max_retries(1);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    pub(crate) titles_url: String,
    pub(crate) release_dates_url: String,
    /// Detail API root; `{api_base}/{id}` returns one title's metadata.
    pub(crate) api_base: String,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
    /// Retries for 5xx and network errors. Metadata requests only.
    pub(crate) max_retries: u8,
    pub(crate) retry_base_delay: Duration,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            titles_url: DEFAULT_TITLES_URL.to_string(),
            release_dates_url: DEFAULT_RELEASE_DATES_URL.to_string(),
            api_base: DEFAULT_ASSET_HOST.to_string(),
            user_agent: concat!("nxshelf-catalog/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl CatalogClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_titles_url(mut self, url: impl Into<String>) -> Self {
        self.titles_url = url.into();
        self
    }

    #[must_use]
    pub fn with_release_dates_url(mut self, url: impl Into<String>) -> Self {
        self.release_dates_url = url.into();
        self
    }

    /// Set the detail API root. Defaults to `https://api.nlib.cc/nx`.
    #[must_use]
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout. Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts. Defaults to 3.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff. Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// The detail API root, also the artwork host.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}
