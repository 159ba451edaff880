//! Core domain types, ports, and services for nxshelf.
//!
//! This crate has no HTTP, SQL, or terminal code. Adapters implement the
//! traits in [`ports`] and the binary wires them together.
//!
//! - [`domain`] - title identifiers, catalog entries, queries, wishlist
//! - [`transfer`] - transfer records and their state machine
//! - [`ports`] - traits for storage, catalog source, transport, events
//! - [`services`] - catalog and wishlist services behind [`AppCore`]
//! - [`paths`] - data directory resolution

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod transfer;

// Re-export commonly used types for convenience
pub use domain::{
    CatalogQuery, CatalogSort, CatalogTitle, DEFAULT_ASSET_HOST, DEFAULT_PAGE_SIZE, TitleAssets,
    TitleDetail, TitleId, TitleIdError, TitlePage, TitleRole, WishlistEntry, base_title_id,
    classify, format_size,
};
pub use paths::{PathError, ResolvedPaths, data_root, database_path, downloads_dir, partial_dir};
pub use ports::{
    BroadcastTransferEmitter, CatalogError, CatalogSourcePort, CoreError, NoopTransferEmitter,
    PayloadStorePort, Repos, RepositoryError, TitleRepository, TransferEventEmitterPort,
    TransferRepositoryPort, TransportPort, TransportRequest, WishlistRepository,
};
pub use services::{AppCore, CatalogService, RefreshSummary, TitleGroup, WishlistService};
pub use transfer::{
    PauseDecision, ResumePlan, ResumeToken, TransferError, TransferEvent, TransferId,
    TransferItem, TransferResult, TransferState, TransportHandle, TransportNotification,
    TransportSignal,
};
