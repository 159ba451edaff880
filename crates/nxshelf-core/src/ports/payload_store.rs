//! Payload store port definition.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::transfer::{TransferItem, TransferResult};

/// Port for moving a finished payload to durable storage.
///
/// Failures must be reported as `TransferError::Storage` carrying the cause;
/// the controller turns them into a Failed transfer.
#[async_trait]
pub trait PayloadStorePort: Send + Sync {
    /// Move `temp_path` to its final location and return that location.
    async fn persist(&self, item: &TransferItem, temp_path: &Path) -> TransferResult<PathBuf>;
}
