//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - Repositories are minimal and record-focused
//! - The transport reports through a channel, never through callbacks

pub mod catalog_source;
pub mod payload_store;
pub mod title_repository;
pub mod transfer_event_emitter;
pub mod transfer_repository;
pub mod transport;
pub mod wishlist_repository;

use std::sync::Arc;
use thiserror::Error;

pub use catalog_source::{CatalogError, CatalogSourcePort};
pub use payload_store::PayloadStorePort;
pub use title_repository::TitleRepository;
pub use transfer_event_emitter::{
    BroadcastTransferEmitter, NoopTransferEmitter, TransferEventEmitterPort,
};
pub use transfer_repository::TransferRepositoryPort;
pub use transport::{TransportPort, TransportRequest};
pub use wishlist_repository::WishlistRepository;

use crate::domain::TitleIdError;

/// Container for all repository trait objects.
///
/// Lives in `nxshelf-core` so that `AppCore` can accept it without depending
/// on `nxshelf-db`.
///
/// ```ignore
/// let repos = nxshelf_db::CoreFactory::build_repos(pool.clone());
/// let core = AppCore::new(repos, catalog_source);
/// ```
#[derive(Clone)]
pub struct Repos {
    pub titles: Arc<dyn TitleRepository>,
    pub wishlist: Arc<dyn WishlistRepository>,
    pub transfers: Arc<dyn TransferRepositoryPort>,
}

impl Repos {
    /// Create a new Repos container.
    pub fn new(
        titles: Arc<dyn TitleRepository>,
        wishlist: Arc<dyn WishlistRepository>,
        transfers: Arc<dyn TransferRepositoryPort>,
    ) -> Self {
        Self {
            titles,
            wishlist,
            transfers,
        }
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored value could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Root error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    TitleId(#[from] TitleIdError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),
}
