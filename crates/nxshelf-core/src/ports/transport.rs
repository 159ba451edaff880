//! Transport port definition.
//!
//! A transport moves bytes for one attempt at a time and reports back on the
//! notification channel it was built with. It never retries on its own.

use async_trait::async_trait;

use crate::transfer::{ResumeToken, TransferId, TransferResult, TransportHandle};

/// A fresh fetch of `url`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    /// Transfer the bytes belong to. Stable across attempts and processes,
    /// unlike the handle.
    pub transfer_id: TransferId,
    /// Minted by the caller so routing exists before the first notification.
    pub handle: TransportHandle,
    pub url: String,
}

/// Port for the component that performs byte transfers.
///
/// All three calls return as soon as the request is handed off. Outcomes
/// arrive later as `TransportNotification`s tagged with the handle.
///
/// # Usage
///
/// ```ignore
/// transport.issue(TransportRequest { transfer_id, handle, url }).await?;
/// // ... later, on pause:
/// transport.cancel_with_checkpoint(handle).await?;
/// // a Checkpoint { token } notification follows
/// ```
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// Start fetching from the beginning.
    async fn issue(&self, request: TransportRequest) -> TransferResult<()>;

    /// Continue from a checkpoint produced by this transport.
    async fn issue_resumable(
        &self,
        handle: TransportHandle,
        token: &ResumeToken,
    ) -> TransferResult<()>;

    /// Stop the attempt and deliver a `Checkpoint` notification for it.
    ///
    /// If the attempt already finished or failed, no checkpoint follows; the
    /// terminal notification already sent stands.
    async fn cancel_with_checkpoint(&self, handle: TransportHandle) -> TransferResult<()>;
}
