//! HTTP transport: streaming GETs into temp files, resumable via `Range`.
//!
//! Each attempt runs on its own task and reports through the notification
//! channel given at construction. Partial files are named after the
//! transfer, so a later process never reuses another transfer's bytes. Attempts never retry; a failed attempt is
//! reported once and forgotten.

mod attempt;
mod token;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nxshelf_core::{
    ResumeToken, TransferError, TransferId, TransferResult, TransportHandle,
    TransportNotification, TransportPort, TransportRequest,
};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use attempt::Attempt;
use token::Checkpoint;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// `TransportPort` over HTTP(S).
pub struct HttpTransport {
    client: reqwest::Client,
    temp_dir: PathBuf,
    notifications: mpsc::UnboundedSender<TransportNotification>,
    /// Cancellation for each running attempt.
    attempts: Arc<Mutex<HashMap<TransportHandle, CancellationToken>>>,
}

impl HttpTransport {
    /// Create a transport writing partial files under `temp_dir`.
    pub fn new(
        temp_dir: impl Into<PathBuf>,
        notifications: mpsc::UnboundedSender<TransportNotification>,
    ) -> TransferResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("nxshelf/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransferError::transport(format!("Cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            temp_dir: temp_dir.into(),
            notifications,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Create a transport together with the receiver for its notifications.
    pub fn with_channel(
        temp_dir: impl Into<PathBuf>,
    ) -> TransferResult<(Self, mpsc::UnboundedReceiver<TransportNotification>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        Ok((Self::new(temp_dir, tx)?, rx))
    }

    fn partial_path(&self, transfer_id: TransferId) -> PathBuf {
        self.temp_dir.join(format!("{transfer_id}.part"))
    }

    async fn launch(
        &self,
        handle: TransportHandle,
        url: String,
        partial_path: PathBuf,
        offset: u64,
        etag: Option<String>,
    ) -> TransferResult<()> {
        if let Some(parent) = partial_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TransferError::storage(format!("Cannot create {}: {e}", parent.display())))?;
        }

        let cancel = CancellationToken::new();
        {
            let mut attempts = self.attempts.lock().await;
            if attempts.contains_key(&handle) {
                return Err(TransferError::transport(format!("Handle {handle} is already in use")));
            }
            attempts.insert(handle, cancel.clone());
        }

        tracing::debug!(
            target: "nxshelf.transfer",
            handle = %handle,
            url = %url,
            offset,
            "Issuing HTTP request"
        );

        let attempt = Attempt {
            handle,
            url,
            partial_path,
            offset,
            etag,
            cancel,
            notifications: self.notifications.clone(),
        };
        let client = self.client.clone();
        let attempts = Arc::clone(&self.attempts);
        let notifications = self.notifications.clone();

        tokio::spawn(async move {
            let outcome = attempt.run(client).await;
            attempts.lock().await.remove(&handle);
            tracing::debug!(target: "nxshelf.transfer", handle = %handle, outcome = ?outcome, "HTTP attempt ended");
            let _ = notifications.send(TransportNotification::new(handle, outcome.into()));
        });

        Ok(())
    }
}

#[async_trait]
impl TransportPort for HttpTransport {
    async fn issue(&self, request: TransportRequest) -> TransferResult<()> {
        let partial_path = self.partial_path(request.transfer_id);
        self.launch(request.handle, request.url, partial_path, 0, None)
            .await
    }

    async fn issue_resumable(
        &self,
        handle: TransportHandle,
        token: &ResumeToken,
    ) -> TransferResult<()> {
        let checkpoint = Checkpoint::decode(token)?;
        // What is on disk wins over the recorded count; the file may even
        // have been removed while paused.
        let offset = tokio::fs::metadata(&checkpoint.partial_path)
            .await
            .map_or(0, |meta| meta.len());
        if offset != checkpoint.bytes_written {
            tracing::debug!(
                target: "nxshelf.transfer",
                handle = %handle,
                recorded = checkpoint.bytes_written,
                on_disk = offset,
                "Partial file differs from checkpoint"
            );
        }
        self.launch(
            handle,
            checkpoint.url,
            checkpoint.partial_path,
            offset,
            checkpoint.etag,
        )
        .await
    }

    async fn cancel_with_checkpoint(&self, handle: TransportHandle) -> TransferResult<()> {
        match self.attempts.lock().await.get(&handle) {
            Some(cancel) => cancel.cancel(),
            None => tracing::debug!(
                target: "nxshelf.transfer",
                handle = %handle,
                "Cancel for an attempt that already ended"
            ),
        }
        Ok(())
    }
}
