//! Transfer engine for nxshelf.
//!
//! - `controller` - owns transfers and serialises their state changes
//! - `http` - streaming HTTP transport with checkpoint/resume
//! - `store` - moves finished payloads into the downloads directory
//! - `progress` - rate-limiting for progress events
//!
//! ```ignore
//! let (transport, notifications) = HttpTransport::with_channel(paths.partial_dir)?;
//! let controller = build_transfer_controller(TransferControllerDeps {
//!     transport: Arc::new(transport),
//!     notifications,
//!     repo,
//!     payloads: Arc::new(FsPayloadStore::new(paths.downloads_dir)),
//!     emitter: Arc::new(NoopTransferEmitter::new()),
//! });
//! let id = controller.start(title_id, url).await?;
//! ```

#![deny(unsafe_code)]

// Re-export core types for convenience
pub use nxshelf_core::{
    PayloadStorePort, ResumeToken, TransferError, TransferEvent, TransferId, TransferItem,
    TransferRepositoryPort, TransferResult, TransferState, TransportHandle,
    TransportNotification, TransportPort, TransportRequest, TransportSignal,
};

mod controller;
mod http;
pub(crate) mod progress;
mod store;

pub use controller::{TransferController, TransferControllerDeps, build_transfer_controller};
pub use http::HttpTransport;
pub use progress::ProgressThrottle;
pub use store::FsPayloadStore;
