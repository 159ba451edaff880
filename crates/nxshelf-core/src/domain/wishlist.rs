//! Wishlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::title_id::TitleId;

/// A title the user has marked for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub title_id: TitleId,
    /// Title name captured when the entry was added.
    pub name: String,
    pub added_at: DateTime<Utc>,
}

impl WishlistEntry {
    /// New entry stamped with the current time.
    pub fn new(title_id: TitleId, name: impl Into<String>) -> Self {
        Self {
            title_id,
            name: name.into(),
            added_at: Utc::now(),
        }
    }
}
