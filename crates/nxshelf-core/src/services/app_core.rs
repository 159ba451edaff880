//! `AppCore` - the primary application facade.
//!
//! This is the composition root for core services. Adapters receive an
//! `AppCore` instance and use it to access catalog functionality. Transfers
//! are driven separately by the transfer controller.

use std::sync::Arc;

use crate::ports::{CatalogSourcePort, Repos};

use super::{CatalogService, WishlistService};

/// The core application facade.
///
/// ```ignore
/// let repos = nxshelf_db::CoreFactory::build_repos(pool.clone());
/// let core = AppCore::new(repos, Arc::new(catalog_client));
/// let page = core.catalog().page(&CatalogQuery::default()).await?;
/// ```
pub struct AppCore {
    catalog: CatalogService,
    wishlist: WishlistService,
    repos: Repos,
}

impl AppCore {
    pub fn new(repos: Repos, source: Arc<dyn CatalogSourcePort>) -> Self {
        Self {
            catalog: CatalogService::new(repos.titles.clone(), source),
            wishlist: WishlistService::new(repos.wishlist.clone(), repos.titles.clone()),
            repos,
        }
    }

    /// Access the catalog service.
    pub const fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Access the wishlist service.
    pub const fn wishlist(&self) -> &WishlistService {
        &self.wishlist
    }

    /// The repositories this core was built with.
    pub const fn repos(&self) -> &Repos {
        &self.repos
    }
}
