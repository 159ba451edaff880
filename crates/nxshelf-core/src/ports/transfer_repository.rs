//! Transfer repository port definition.
//!
//! # Persistence Scope
//!
//! The controller saves an item after every state transition. Progress is
//! written along with those saves, not per notification.

use async_trait::async_trait;

use super::RepositoryError;
use crate::transfer::{TransferId, TransferItem};

/// Port for persisting transfer records.
///
/// This trait is implemented by `nxshelf-db` and injected into the transfer
/// controller.
#[async_trait]
pub trait TransferRepositoryPort: Send + Sync {
    /// Insert or replace the record for `item.id`.
    async fn save(&self, item: &TransferItem) -> Result<(), RepositoryError>;

    /// Fetch one record.
    async fn get(&self, id: TransferId) -> Result<Option<TransferItem>, RepositoryError>;

    /// All records, newest first.
    async fn list(&self) -> Result<Vec<TransferItem>, RepositoryError>;

    /// Remove a record. Missing records are `NotFound`.
    async fn delete(&self, id: TransferId) -> Result<(), RepositoryError>;
}
