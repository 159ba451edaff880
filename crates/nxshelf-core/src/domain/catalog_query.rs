//! Catalog search, sort, and paging types.

use serde::{Deserialize, Serialize};

use super::title::CatalogTitle;

/// Default number of titles per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Ordering applied to catalog listings.
///
/// Titles without a release date sort after dated titles in both date orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    /// Name, A to Z.
    NameAsc,
    /// Name, Z to A.
    NameDesc,
    /// Oldest release first.
    ReleaseDateAsc,
    /// Newest release first.
    #[default]
    ReleaseDateDesc,
    /// Smallest payload first.
    SizeAsc,
    /// Largest payload first.
    SizeDesc,
}

impl CatalogSort {
    /// All orderings, in menu order.
    pub const ALL: [Self; 6] = [
        Self::NameAsc,
        Self::NameDesc,
        Self::ReleaseDateAsc,
        Self::ReleaseDateDesc,
        Self::SizeAsc,
        Self::SizeDesc,
    ];

    /// Command-line spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::ReleaseDateAsc => "date-asc",
            Self::ReleaseDateDesc => "date-desc",
            Self::SizeAsc => "size-asc",
            Self::SizeDesc => "size-desc",
        }
    }

    /// Parse from the spelling produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sort| sort.as_str() == s)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NameAsc => "Name (A-Z)",
            Self::NameDesc => "Name (Z-A)",
            Self::ReleaseDateAsc => "Release Date (Oldest)",
            Self::ReleaseDateDesc => "Release Date (Newest)",
            Self::SizeAsc => "Size (Smallest)",
            Self::SizeDesc => "Size (Largest)",
        }
    }
}

/// A page request against the local catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against title names.
    pub search: Option<String>,
    pub sort: CatalogSort,
    /// Zero-based page index.
    pub page: u32,
    pub page_size: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: CatalogSort::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogQuery {
    /// Set the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort: CatalogSort) -> Self {
        self.sort = sort;
        self
    }

    /// Set the page index.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size. Zero is treated as one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Search text with surrounding whitespace removed, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.page_size as u64
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlePage {
    pub items: Vec<CatalogTitle>,
    pub page: u32,
    pub page_size: u32,
    /// Titles matching the search across all pages.
    pub total: u64,
    /// Whether another page follows this one.
    pub has_more: bool,
}

impl TitlePage {
    /// Assemble a page and compute `has_more`.
    pub fn new(items: Vec<CatalogTitle>, query: &CatalogQuery, total: u64) -> Self {
        let seen = query.offset() + items.len() as u64;
        Self {
            items,
            page: query.page,
            page_size: query.page_size,
            total,
            has_more: seen < total,
        }
    }
}
