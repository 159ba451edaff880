//! Application services built on the ports.

mod app_core;
mod catalog_service;
mod wishlist_service;

pub use app_core::AppCore;
pub use catalog_service::{CatalogService, RefreshSummary, TitleGroup};
pub use wishlist_service::WishlistService;
