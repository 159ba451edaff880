//! Transfer controller implementation.
//!
//! # Architecture
//!
//! - **Actor**: one task per `TransferItem`, the only code that mutates it
//! - **Router**: maps transport handles to actor mailboxes
//! - **Dispatcher**: drains the transport's multiplexed notification channel
//!   into the router
//!
//! # Concurrency Model
//!
//! - Commands and transport signals for one item share a mailbox and are
//!   handled in arrival order
//! - Different items never wait on each other
//! - Handles are minted before a request is issued; a superseded handle's
//!   notifications are dropped
//! - Readers get `watch` snapshots, never the live item

mod actor;
mod router;

use std::collections::HashMap;
use std::sync::Arc;

use nxshelf_core::{
    PayloadStorePort, TitleId, TransferError, TransferEventEmitterPort, TransferId, TransferItem,
    TransferRepositoryPort, TransferResult, TransportNotification, TransportPort,
};
use tokio::sync::{RwLock, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use actor::{ActorDeps, ItemActor, Message, Reply};
use router::Router;

/// Dependencies for creating a transfer controller.
///
/// `notifications` must be the receiving end of the channel `transport`
/// reports on.
pub struct TransferControllerDeps<T, R, P, E>
where
    T: TransportPort + 'static,
    R: TransferRepositoryPort + 'static,
    P: PayloadStorePort + 'static,
    E: TransferEventEmitterPort + 'static,
{
    /// Performs the byte transfers.
    pub transport: Arc<T>,
    /// Signals from `transport`, tagged by handle.
    pub notifications: mpsc::UnboundedReceiver<TransportNotification>,
    /// Port for persisting transfer records.
    pub repo: Arc<R>,
    /// Moves finished payloads to durable storage.
    pub payloads: Arc<P>,
    /// Port for emitting transfer events.
    pub emitter: Arc<E>,
}

/// Build a transfer controller and start its dispatcher.
///
/// Must be called from within a Tokio runtime.
pub fn build_transfer_controller<T, R, P, E>(
    deps: TransferControllerDeps<T, R, P, E>,
) -> TransferController
where
    T: TransportPort + 'static,
    R: TransferRepositoryPort + 'static,
    P: PayloadStorePort + 'static,
    E: TransferEventEmitterPort + 'static,
{
    let router = Arc::new(Router::default());
    let cancel = CancellationToken::new();

    let dispatcher_router = Arc::clone(&router);
    let dispatcher_cancel = cancel.clone();
    let notifications = deps.notifications;
    tokio::spawn(async move {
        router::dispatch(&dispatcher_router, notifications, dispatcher_cancel).await;
    });

    TransferController {
        inner: Arc::new(Inner {
            deps: Arc::new(ActorDeps {
                transport: deps.transport,
                repo: deps.repo,
                payloads: deps.payloads,
                emitter: deps.emitter,
                router,
            }),
            items: RwLock::new(HashMap::new()),
            cancel,
        }),
    }
}

/// Handle to an item's owner, kept by the controller.
struct Slot {
    /// `None` for items that were already terminal when restored.
    mailbox: Option<mpsc::UnboundedSender<Message>>,
    snapshot: watch::Receiver<TransferItem>,
}

struct Inner {
    deps: Arc<ActorDeps>,
    items: RwLock<HashMap<TransferId, Slot>>,
    cancel: CancellationToken,
}

/// Owns every transfer and mediates between callers and the transport.
///
/// `start`, `pause` and `resume` return once the request is handed to the
/// item's owner and, where needed, to the transport. Outcomes show up later
/// in snapshots and events.
#[derive(Clone)]
pub struct TransferController {
    inner: Arc<Inner>,
}

impl TransferController {
    /// Create a Queued transfer for `source_url` and issue it.
    ///
    /// If the transport refuses the request the item is recorded as Failed;
    /// the returned id still refers to it.
    pub async fn start(
        &self,
        source_id: TitleId,
        source_url: impl Into<String>,
    ) -> TransferResult<TransferId> {
        if self.inner.cancel.is_cancelled() {
            return Err(TransferError::Shutdown);
        }

        let item = TransferItem::new(source_id, source_url);
        let id = item.id;
        self.adopt(item).await;
        self.command(id, "start", |reply| Message::Start { reply })
            .await?;
        Ok(id)
    }

    /// Ask the transport to checkpoint the transfer.
    ///
    /// The item becomes Paused when the checkpoint arrives. Calling again
    /// before then, or on a Paused item, is a no-op.
    pub async fn pause(&self, id: TransferId) -> TransferResult<()> {
        self.command(id, "pause", |reply| Message::Pause { reply })
            .await
    }

    /// Continue a Paused transfer, from its checkpoint if it has one.
    pub async fn resume(&self, id: TransferId) -> TransferResult<()> {
        self.command(id, "resume", |reply| Message::Resume { reply })
            .await
    }

    /// Current state of one transfer.
    pub async fn get(&self, id: TransferId) -> Option<TransferItem> {
        let items = self.inner.items.read().await;
        items.get(&id).map(|slot| slot.snapshot.borrow().clone())
    }

    /// Consistent copy of every known transfer, newest first.
    pub async fn snapshot(&self) -> Vec<TransferItem> {
        let mut all: Vec<TransferItem> = {
            let items = self.inner.items.read().await;
            items
                .values()
                .map(|slot| slot.snapshot.borrow().clone())
                .collect()
        };
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Watch one transfer. The receiver sees every committed change and
    /// every progress update.
    pub async fn subscribe(&self, id: TransferId) -> TransferResult<watch::Receiver<TransferItem>> {
        let items = self.inner.items.read().await;
        items
            .get(&id)
            .map(|slot| slot.snapshot.clone())
            .ok_or_else(|| TransferError::not_found(id))
    }

    /// Load persisted transfers.
    ///
    /// Items saved as Queued or Active lost their transport attempt when the
    /// previous process exited; they come back Paused with no checkpoint, so
    /// `resume` restarts them from the source. Returns how many items were
    /// loaded.
    pub async fn restore(&self) -> TransferResult<usize> {
        let stored = self
            .inner
            .deps
            .repo
            .list()
            .await
            .map_err(|e| TransferError::repository(e.to_string()))?;

        let mut restored = 0;
        for mut item in stored {
            if self.inner.items.read().await.contains_key(&item.id) {
                continue;
            }
            if item.interrupt() {
                tracing::info!(
                    target: "nxshelf.transfer",
                    id = %item.id,
                    "Interrupted transfer restored as paused"
                );
                if let Err(e) = self.inner.deps.repo.save(&item).await {
                    tracing::warn!(
                        target: "nxshelf.transfer",
                        id = %item.id,
                        error = %e,
                        "Failed to save restored transfer"
                    );
                }
            }
            self.adopt(item).await;
            restored += 1;
        }

        tracing::debug!(target: "nxshelf.transfer", restored, "Transfers restored");
        Ok(restored)
    }

    /// Stop the dispatcher and every owner task.
    ///
    /// In-flight transport attempts are not checkpointed; pause them first to
    /// keep them resumable.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        tracing::debug!(target: "nxshelf.transfer", "Transfer controller shut down");
    }

    async fn adopt(&self, item: TransferItem) {
        let id = item.id;
        let slot = if item.state.is_terminal() {
            let (_, snapshot) = watch::channel(item);
            Slot {
                mailbox: None,
                snapshot,
            }
        } else {
            let (mailbox, snapshot) =
                ItemActor::spawn(item, Arc::clone(&self.inner.deps), self.inner.cancel.clone());
            Slot {
                mailbox: Some(mailbox),
                snapshot,
            }
        };
        self.inner.items.write().await.insert(id, slot);
    }

    async fn command(
        &self,
        id: TransferId,
        operation: &'static str,
        build: impl FnOnce(Reply) -> Message,
    ) -> TransferResult<()> {
        if self.inner.cancel.is_cancelled() {
            return Err(TransferError::Shutdown);
        }

        let (mailbox, snapshot) = {
            let items = self.inner.items.read().await;
            let slot = items.get(&id).ok_or_else(|| TransferError::not_found(id))?;
            (slot.mailbox.clone(), slot.snapshot.clone())
        };

        if let Some(mailbox) = mailbox {
            let (reply, response) = oneshot::channel();
            if mailbox.send(build(reply)).is_ok() {
                if let Ok(result) = response.await {
                    return result;
                }
            }
        }

        // The owner has exited: the item is terminal or we are shutting down.
        if self.inner.cancel.is_cancelled() {
            return Err(TransferError::Shutdown);
        }
        let state = snapshot.borrow().state;
        Err(TransferError::invalid_state(operation, state))
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
