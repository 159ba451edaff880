//! Per-transfer owner task.
//!
//! Each `TransferItem` is owned by exactly one `ItemActor`. Commands from the
//! controller and signals from the transport arrive on the same mailbox and
//! are handled one at a time, so mutations of an item never interleave.
//! The actor exits once its item is terminal.

use std::path::PathBuf;
use std::sync::Arc;

use nxshelf_core::{
    PauseDecision, PayloadStorePort, ResumePlan, TransferError, TransferEvent,
    TransferEventEmitterPort, TransferItem, TransferRepositoryPort, TransferResult, TransferState,
    TransportHandle, TransportPort, TransportRequest, TransportSignal,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use super::router::Router;
use crate::progress::ProgressThrottle;

pub(super) type Reply = oneshot::Sender<TransferResult<()>>;

/// Mailbox message for an item's owner.
pub(super) enum Message {
    Start { reply: Reply },
    Pause { reply: Reply },
    Resume { reply: Reply },
    Signal {
        handle: TransportHandle,
        signal: TransportSignal,
    },
}

/// Ports shared by every actor.
pub(super) struct ActorDeps {
    pub transport: Arc<dyn TransportPort>,
    pub repo: Arc<dyn TransferRepositoryPort>,
    pub payloads: Arc<dyn PayloadStorePort>,
    pub emitter: Arc<dyn TransferEventEmitterPort>,
    pub router: Arc<Router>,
}

pub(super) struct ItemActor {
    item: TransferItem,
    /// Handle of the attempt whose signals are accepted.
    current: Option<TransportHandle>,
    deps: Arc<ActorDeps>,
    inbox: mpsc::UnboundedReceiver<Message>,
    /// Own mailbox, registered with the router for each new attempt.
    outbox: mpsc::UnboundedSender<Message>,
    snapshot: watch::Sender<TransferItem>,
    throttle: ProgressThrottle,
}

impl ItemActor {
    /// Spawn the owner task for `item`.
    pub(super) fn spawn(
        item: TransferItem,
        deps: Arc<ActorDeps>,
        cancel: CancellationToken,
    ) -> (mpsc::UnboundedSender<Message>, watch::Receiver<TransferItem>) {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let (snapshot, snapshot_rx) = watch::channel(item.clone());

        let actor = Self {
            item,
            current: None,
            deps,
            inbox,
            outbox: outbox.clone(),
            snapshot,
            throttle: ProgressThrottle::default(),
        };
        tokio::spawn(actor.run(cancel));

        (outbox, snapshot_rx)
    }

    async fn run(mut self, cancel: CancellationToken) {
        loop {
            let message = tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                next = self.inbox.recv() => match next {
                    Some(message) => message,
                    None => break,
                },
            };

            self.handle(message).await;

            if self.item.state.is_terminal() {
                break;
            }
        }

        if let Some(handle) = self.current.take() {
            self.deps.router.forget(handle).await;
        }
        tracing::debug!(
            target: "nxshelf.transfer",
            id = %self.item.id,
            state = %self.item.state,
            "Transfer owner exited"
        );
    }

    async fn handle(&mut self, message: Message) {
        match message {
            Message::Start { reply } => {
                let result = self.start().await;
                let _ = reply.send(result);
            }
            Message::Pause { reply } => {
                let result = self.pause().await;
                let _ = reply.send(result);
            }
            Message::Resume { reply } => {
                let result = self.resume().await;
                let _ = reply.send(result);
            }
            Message::Signal { handle, signal } => {
                if self.current == Some(handle) {
                    self.on_signal(signal).await;
                } else {
                    tracing::debug!(
                        target: "nxshelf.transfer",
                        id = %self.item.id,
                        handle = %handle,
                        "Ignoring signal from a superseded attempt"
                    );
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    async fn start(&mut self) -> TransferResult<()> {
        if self.item.state != TransferState::Queued || self.current.is_some() {
            return Err(TransferError::invalid_state("start", self.item.state));
        }

        self.commit().await;
        let handle = self.begin_attempt().await;
        tracing::info!(
            target: "nxshelf.transfer",
            id = %self.item.id,
            source_id = %self.item.source_id,
            handle = %handle,
            "Transfer started"
        );

        let request = TransportRequest {
            transfer_id: self.item.id,
            handle,
            url: self.item.source_url.clone(),
        };
        if let Err(e) = self.deps.transport.issue(request).await {
            self.abort_attempt(e).await;
        }
        Ok(())
    }

    async fn pause(&mut self) -> TransferResult<()> {
        match self.item.request_pause()? {
            PauseDecision::RequestCheckpoint => {
                let Some(handle) = self.current else {
                    // No attempt to checkpoint; nothing to resume from.
                    self.item.checkpoint(None)?;
                    self.commit().await;
                    return Ok(());
                };
                tracing::info!(
                    target: "nxshelf.transfer",
                    id = %self.item.id,
                    handle = %handle,
                    "Pause requested"
                );
                if let Err(e) = self.deps.transport.cancel_with_checkpoint(handle).await {
                    self.abort_attempt(e).await;
                } else {
                    self.publish();
                }
            }
            PauseDecision::AlreadyRequested | PauseDecision::AlreadyPaused => {
                tracing::debug!(
                    target: "nxshelf.transfer",
                    id = %self.item.id,
                    state = %self.item.state,
                    "Pause already in effect"
                );
            }
        }
        Ok(())
    }

    async fn resume(&mut self) -> TransferResult<()> {
        let plan = self.item.resume()?;
        let handle = self.begin_attempt().await;
        self.commit().await;

        let issued = match plan {
            ResumePlan::FromCheckpoint(token) => {
                tracing::info!(
                    target: "nxshelf.transfer",
                    id = %self.item.id,
                    handle = %handle,
                    "Resuming from checkpoint"
                );
                self.deps.transport.issue_resumable(handle, &token).await
            }
            ResumePlan::Fresh { url } => {
                tracing::info!(
                    target: "nxshelf.transfer",
                    id = %self.item.id,
                    handle = %handle,
                    "No checkpoint, restarting from source"
                );
                self.deps
                    .transport
                    .issue(TransportRequest {
                        transfer_id: self.item.id,
                        handle,
                        url,
                    })
                    .await
            }
        };
        if let Err(e) = issued {
            self.abort_attempt(e).await;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Transport signals
    // ------------------------------------------------------------------------

    async fn on_signal(&mut self, signal: TransportSignal) {
        match signal {
            TransportSignal::Accepted => match self.item.accept() {
                Ok(true) => self.commit().await,
                Ok(false) => {}
                Err(e) => self.ignore("accepted", &e),
            },
            TransportSignal::Progress {
                bytes_written,
                total_bytes,
            } => {
                let was_queued = self.item.state == TransferState::Queued;
                match self.item.record_progress(bytes_written, total_bytes) {
                    Ok(moved) => {
                        if was_queued {
                            self.commit().await;
                        } else {
                            self.publish();
                        }
                        if moved && self.throttle.admit(self.item.progress_fraction) {
                            self.deps.emitter.emit(TransferEvent::progress(&self.item));
                        }
                    }
                    Err(e) => self.ignore("progress", &e),
                }
            }
            TransportSignal::Finished { local_temp_path } => self.finish(local_temp_path).await,
            TransportSignal::Failed { error } => {
                if self.item.state.is_terminal() {
                    return;
                }
                tracing::warn!(
                    target: "nxshelf.transfer",
                    id = %self.item.id,
                    error = %error,
                    "Transfer failed"
                );
                self.end_attempt().await;
                if let Err(e) = self.item.fail(error) {
                    self.ignore("failed", &e);
                    return;
                }
                self.commit().await;
            }
            TransportSignal::Checkpoint { token } => {
                let resumable = token.is_some();
                match self.item.checkpoint(token) {
                    Ok(()) => {
                        self.end_attempt().await;
                        tracing::info!(
                            target: "nxshelf.transfer",
                            id = %self.item.id,
                            resumable,
                            "Transfer paused"
                        );
                        self.commit().await;
                    }
                    Err(e) => self.ignore("checkpoint", &e),
                }
            }
        }
    }

    async fn finish(&mut self, temp_path: PathBuf) {
        if !matches!(self.item.state, TransferState::Queued | TransferState::Active) {
            tracing::debug!(
                target: "nxshelf.transfer",
                id = %self.item.id,
                state = %self.item.state,
                "Ignoring completion outside an active attempt"
            );
            return;
        }
        self.end_attempt().await;

        let outcome = match self.deps.payloads.persist(&self.item, &temp_path).await {
            Ok(local_path) => {
                tracing::info!(
                    target: "nxshelf.transfer",
                    id = %self.item.id,
                    path = %local_path.display(),
                    "Transfer completed"
                );
                self.item.complete(local_path)
            }
            Err(e) => {
                tracing::warn!(
                    target: "nxshelf.transfer",
                    id = %self.item.id,
                    error = %e,
                    "Could not store transferred payload"
                );
                self.item.fail(e)
            }
        };

        match outcome {
            Ok(()) => self.commit().await,
            Err(e) => self.ignore("finished", &e),
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Mint a handle for a new attempt; the previous one stops routing here.
    async fn begin_attempt(&mut self) -> TransportHandle {
        self.end_attempt().await;
        let handle = self.deps.router.register(self.outbox.clone()).await;
        self.current = Some(handle);
        self.throttle.reset();
        handle
    }

    async fn end_attempt(&mut self) {
        if let Some(handle) = self.current.take() {
            self.deps.router.forget(handle).await;
        }
    }

    /// The transport refused a request; the attempt is lost.
    async fn abort_attempt(&mut self, error: TransferError) {
        tracing::warn!(
            target: "nxshelf.transfer",
            id = %self.item.id,
            error = %error,
            "Transport rejected request"
        );
        self.end_attempt().await;
        if self.item.fail(error).is_ok() {
            self.commit().await;
        }
    }

    /// Save, publish and announce the item's current state.
    async fn commit(&self) {
        if let Err(e) = self.deps.repo.save(&self.item).await {
            tracing::warn!(
                target: "nxshelf.transfer",
                id = %self.item.id,
                state = %self.item.state,
                error = %e,
                "Failed to save transfer"
            );
        }
        self.publish();
        self.deps.emitter.emit(TransferEvent::for_state(&self.item));
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.item.clone());
    }

    fn ignore(&self, signal: &'static str, error: &TransferError) {
        tracing::debug!(
            target: "nxshelf.transfer",
            id = %self.item.id,
            signal,
            error = %error,
            "Ignoring signal"
        );
    }
}
