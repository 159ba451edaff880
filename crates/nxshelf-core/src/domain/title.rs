//! Catalog title types.
//!
//! These types represent titles in the local catalog, independent of the
//! remote format they were fetched in or the table they are stored in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::title_id::{TitleId, TitleRole};

/// Default host for per-title artwork.
pub const DEFAULT_ASSET_HOST: &str = "https://api.nlib.cc/nx";

/// Number of screenshots the asset host serves per base title.
pub const SCREENSHOT_COUNT: u32 = 6;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

// ─────────────────────────────────────────────────────────────────────────────
// Catalog Entries
// ─────────────────────────────────────────────────────────────────────────────

/// A title in the local catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTitle {
    /// Content identifier.
    pub id: TitleId,
    /// Display name.
    pub name: String,
    /// Version string as published by the catalog source.
    pub version: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// Release date, when the date list knows it.
    pub release_date: Option<NaiveDate>,
    /// Base title this entry groups under (equal to `id` for base titles).
    pub base_id: TitleId,
}

impl CatalogTitle {
    /// Build a title, deriving its base id.
    pub fn new(
        id: TitleId,
        name: impl Into<String>,
        version: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        let base_id = id.base();
        Self {
            id,
            name: name.into(),
            version: version.into(),
            size_bytes,
            release_date: None,
            base_id,
        }
    }

    /// Attach a release date.
    #[must_use]
    pub const fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Role of this entry relative to its base title.
    pub fn role(&self) -> TitleRole {
        self.id.role()
    }

    /// Size rendered for display, e.g. `"1.50 GB"` or `"512.00 MB"`.
    pub fn formatted_size(&self) -> String {
        format_size(self.size_bytes)
    }

    /// Artwork URLs served for this title's base id.
    pub fn assets(&self, host: &str) -> TitleAssets {
        TitleAssets::for_base(host, &self.base_id)
    }
}

/// Render a byte count as GB when at least one GiB, otherwise as MB.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(size_bytes: u64) -> String {
    let bytes = size_bytes as f64;
    if bytes / GIB >= 1.0 {
        format!("{:.2} GB", bytes / GIB)
    } else {
        format!("{:.2} MB", bytes / MIB)
    }
}

/// Artwork locations for a base title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleAssets {
    /// 128x128 icon.
    pub icon: String,
    /// 1280x720 banner.
    pub banner: String,
    /// Screenshot URLs, in display order.
    pub screenshots: Vec<String>,
}

impl TitleAssets {
    /// Compute the URLs for `base` on `host`.
    pub fn for_base(host: &str, base: &TitleId) -> Self {
        let root = format!("{}/{base}", host.trim_end_matches('/'));
        Self {
            icon: format!("{root}/icon/128/128"),
            banner: format!("{root}/banner/1280/720"),
            screenshots: (1..=SCREENSHOT_COUNT)
                .map(|n| format!("{root}/screen/{n}"))
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Remote Detail
// ─────────────────────────────────────────────────────────────────────────────

/// Extended metadata served by the title detail API.
///
/// Any field may be missing upstream; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleDetail {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub developer: Option<String>,
    /// Free-form date text as served.
    pub release_date: Option<String>,
    pub version: Option<i64>,
    #[serde(default)]
    pub category: Vec<String>,
    pub intro: Option<String>,
    pub is_demo: Option<bool>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub number_of_players: Option<u32>,
    #[serde(default)]
    pub rating_content: Vec<String>,
    pub region: Option<String>,
    pub rights_id: Option<String>,
    pub console: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub screens: Option<TitleScreens>,
}

/// Screenshot block of a [`TitleDetail`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleScreens {
    pub count: u32,
    #[serde(default)]
    pub screenshots: Vec<String>,
}
