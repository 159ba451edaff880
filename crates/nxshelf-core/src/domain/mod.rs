//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, HTTP, filesystem).
//!
//! # Structure
//!
//! - `title_id` - Identifier validation and base/update/DLC derivation
//! - `title` - Catalog entries, artwork URLs, remote detail records
//! - `catalog_query` - Search, sort, and paging
//! - `wishlist` - Wishlist entries

pub mod catalog_query;
pub mod title;
pub mod title_id;
pub mod wishlist;

pub use catalog_query::{CatalogQuery, CatalogSort, DEFAULT_PAGE_SIZE, TitlePage};
pub use title::{
    CatalogTitle, DEFAULT_ASSET_HOST, TitleAssets, TitleDetail, TitleScreens, format_size,
};
pub use title_id::{TitleId, TitleIdError, TitleRole, base_title_id, classify};
pub use wishlist::WishlistEntry;
