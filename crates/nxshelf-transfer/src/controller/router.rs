//! Handle-to-mailbox routing for transport notifications.
//!
//! Handles are minted here before a request is issued, so a notification
//! can never arrive for a handle the router has not seen. A handle is
//! forgotten once its attempt ends; later notifications for it are dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use nxshelf_core::{TransportHandle, TransportNotification};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use super::actor::Message;

#[derive(Default)]
pub(super) struct Router {
    routes: Mutex<HashMap<TransportHandle, mpsc::UnboundedSender<Message>>>,
    next_handle: AtomicU64,
}

impl Router {
    /// Mint a handle and route its notifications to `mailbox`.
    pub(super) async fn register(&self, mailbox: mpsc::UnboundedSender<Message>) -> TransportHandle {
        let handle = TransportHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        self.routes.lock().await.insert(handle, mailbox);
        handle
    }

    pub(super) async fn forget(&self, handle: TransportHandle) {
        self.routes.lock().await.remove(&handle);
    }

    /// Deliver one notification. Returns `false` if it was dropped.
    pub(super) async fn route(&self, notification: TransportNotification) -> bool {
        let TransportNotification { handle, signal } = notification;
        let mut routes = self.routes.lock().await;

        let Some(mailbox) = routes.get(&handle) else {
            tracing::debug!(
                target: "nxshelf.transfer",
                handle = %handle,
                "Dropping notification for unknown handle"
            );
            return false;
        };

        if mailbox.send(Message::Signal { handle, signal }).is_err() {
            // Owner is gone (terminal or shut down).
            routes.remove(&handle);
            tracing::debug!(
                target: "nxshelf.transfer",
                handle = %handle,
                "Dropping notification for finished transfer"
            );
            return false;
        }
        true
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.routes.lock().await.len()
    }
}

/// Drain the transport's notification channel until it closes or `cancel` fires.
pub(super) async fn dispatch(
    router: &Router,
    mut notifications: mpsc::UnboundedReceiver<TransportNotification>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            next = notifications.recv() => {
                let Some(notification) = next else {
                    tracing::debug!(target: "nxshelf.transfer", "Transport notification channel closed");
                    break;
                };
                router.route(notification).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nxshelf_core::TransportSignal;

    #[tokio::test]
    async fn test_handles_are_unique() {
        let router = Router::default();
        let (tx, _rx) = mpsc::unbounded_channel();

        let a = router.register(tx.clone()).await;
        let b = router.register(tx).await;
        assert_ne!(a, b);
        assert_eq!(router.len().await, 2);
    }

    #[tokio::test]
    async fn test_routes_to_registered_mailbox() {
        let router = Router::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = router.register(tx).await;

        assert!(
            router
                .route(TransportNotification::new(handle, TransportSignal::Accepted))
                .await
        );
        assert!(matches!(
            rx.recv().await,
            Some(Message::Signal {
                signal: TransportSignal::Accepted,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_forgotten_and_unknown_handles_are_dropped() {
        let router = Router::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = router.register(tx).await;
        router.forget(handle).await;

        let stale = TransportNotification::new(handle, TransportSignal::Accepted);
        assert!(!router.route(stale).await);

        let unknown = TransportNotification::new(TransportHandle::new(999), TransportSignal::Accepted);
        assert!(!router.route(unknown).await);
    }

    #[tokio::test]
    async fn test_closed_mailbox_is_pruned() {
        let router = Router::default();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = router.register(tx).await;
        drop(rx);

        let n = TransportNotification::new(handle, TransportSignal::Accepted);
        assert!(!router.route(n).await);
        assert_eq!(router.len().await, 0);
    }
}
