//! Integration tests for the `TransferController` lifecycle.
//!
//! A scripted transport records every request and lets the test inject
//! notifications by hand, so each interleaving is reproduced exactly. No
//! network or filesystem access is involved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use nxshelf_core::{RepositoryError, TitleId, TransferEventEmitterPort};
use nxshelf_transfer::{
    PayloadStorePort, ResumeToken, TransferController, TransferControllerDeps, TransferError,
    TransferEvent, TransferId, TransferItem, TransferRepositoryPort, TransferResult,
    TransferState, TransportHandle, TransportNotification, TransportPort, TransportRequest,
    TransportSignal, build_transfer_controller,
};
use tokio::sync::{Mutex, mpsc, watch};

const URL: &str = "https://cdn.example/content/title.nsp";

// ── Scripted transport ─────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Issue {
        transfer_id: TransferId,
        handle: TransportHandle,
        url: String,
    },
    Resumable { handle: TransportHandle, token: ResumeToken },
    Cancel { handle: TransportHandle },
}

/// Records requests; notifications are sent by the test via `signal`.
struct ScriptedTransport {
    calls: Mutex<Vec<Call>>,
    notifications: mpsc::UnboundedSender<TransportNotification>,
    refuse_issue: bool,
}

impl ScriptedTransport {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<TransportNotification>) {
        Self::build(false)
    }

    fn refusing() -> (Arc<Self>, mpsc::UnboundedReceiver<TransportNotification>) {
        Self::build(true)
    }

    fn build(refuse_issue: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<TransportNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            notifications: tx,
            refuse_issue,
        });
        (transport, rx)
    }

    fn signal(&self, handle: TransportHandle, signal: TransportSignal) {
        self.notifications
            .send(TransportNotification::new(handle, signal))
            .unwrap();
    }

    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    /// Handle of the most recent issue or resumable request.
    async fn last_handle(&self) -> TransportHandle {
        self.calls
            .lock()
            .await
            .iter()
            .rev()
            .find_map(|call| match call {
                Call::Issue { handle, .. } | Call::Resumable { handle, .. } => Some(*handle),
                Call::Cancel { .. } => None,
            })
            .expect("no request issued")
    }

    async fn cancel_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, Call::Cancel { .. }))
            .count()
    }
}

#[async_trait]
impl TransportPort for ScriptedTransport {
    async fn issue(&self, request: TransportRequest) -> TransferResult<()> {
        if self.refuse_issue {
            return Err(TransferError::transport("connection refused"));
        }
        self.calls.lock().await.push(Call::Issue {
            transfer_id: request.transfer_id,
            handle: request.handle,
            url: request.url,
        });
        Ok(())
    }

    async fn issue_resumable(
        &self,
        handle: TransportHandle,
        token: &ResumeToken,
    ) -> TransferResult<()> {
        self.calls.lock().await.push(Call::Resumable {
            handle,
            token: token.clone(),
        });
        Ok(())
    }

    async fn cancel_with_checkpoint(&self, handle: TransportHandle) -> TransferResult<()> {
        self.calls.lock().await.push(Call::Cancel { handle });
        Ok(())
    }
}

// ── Repository, store and emitter fakes ───────────────────────────

#[derive(Default)]
struct MemoryRepo {
    items: Mutex<HashMap<TransferId, TransferItem>>,
    saves: AtomicUsize,
}

impl MemoryRepo {
    fn with(items: Vec<TransferItem>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().map(|i| (i.id, i)).collect()),
            saves: AtomicUsize::new(0),
        }
    }

    async fn stored(&self, id: TransferId) -> Option<TransferItem> {
        self.items.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl TransferRepositoryPort for MemoryRepo {
    async fn save(&self, item: &TransferItem) -> Result<(), RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.items.lock().await.insert(item.id, item.clone());
        Ok(())
    }

    async fn get(&self, id: TransferId) -> Result<Option<TransferItem>, RepositoryError> {
        Ok(self.items.lock().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<TransferItem>, RepositoryError> {
        let mut all: Vec<_> = self.items.lock().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn delete(&self, id: TransferId) -> Result<(), RepositoryError> {
        self.items
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}

/// Pretends every payload lands in `/downloads/<file name>`.
struct InstantStore;

#[async_trait]
impl PayloadStorePort for InstantStore {
    async fn persist(&self, _item: &TransferItem, temp_path: &Path) -> TransferResult<PathBuf> {
        Ok(Path::new("/downloads").join(temp_path.file_name().unwrap_or_default()))
    }
}

mock! {
    Store {}

    #[async_trait]
    impl PayloadStorePort for Store {
        async fn persist(&self, item: &TransferItem, temp_path: &Path) -> TransferResult<PathBuf>;
    }
}

#[derive(Clone, Default)]
struct RecordingEmitter {
    events: Arc<std::sync::Mutex<Vec<TransferEvent>>>,
}

impl RecordingEmitter {
    fn events(&self) -> Vec<TransferEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TransferEventEmitterPort for RecordingEmitter {
    fn emit(&self, event: TransferEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort> {
        Box::new(self.clone())
    }
}

// ── Helpers ────────────────────────────────────────────────────────

struct Harness {
    controller: TransferController,
    transport: Arc<ScriptedTransport>,
    repo: Arc<MemoryRepo>,
    emitter: RecordingEmitter,
}

fn harness_with<P: PayloadStorePort + 'static>(
    transport: (Arc<ScriptedTransport>, mpsc::UnboundedReceiver<TransportNotification>),
    repo: MemoryRepo,
    payloads: P,
) -> Harness {
    let (transport, notifications) = transport;
    let repo = Arc::new(repo);
    let emitter = RecordingEmitter::default();
    let controller = build_transfer_controller(TransferControllerDeps {
        transport: Arc::clone(&transport),
        notifications,
        repo: Arc::clone(&repo),
        payloads: Arc::new(payloads),
        emitter: Arc::new(emitter.clone()),
    });
    Harness {
        controller,
        transport,
        repo,
        emitter,
    }
}

fn harness() -> Harness {
    harness_with(ScriptedTransport::new(), MemoryRepo::default(), InstantStore)
}

fn title() -> TitleId {
    TitleId::parse("01001E500F7FC000").unwrap()
}

fn token(bytes: &[u8]) -> ResumeToken {
    ResumeToken::new(bytes.to_vec())
}

async fn wait_until(
    rx: &mut watch::Receiver<TransferItem>,
    what: impl FnMut(&TransferItem) -> bool,
) -> TransferItem {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(what))
        .await
        .expect("timed out waiting for transfer state")
        .expect("transfer owner dropped")
        .clone()
}

async fn wait_for_state(rx: &mut watch::Receiver<TransferItem>, state: TransferState) -> TransferItem {
    wait_until(rx, |item| item.state == state).await
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_issues_request_and_accept_activates() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();

    let calls = h.transport.calls().await;
    assert!(matches!(
        &calls[..],
        [Call::Issue { transfer_id, url, .. }] if *transfer_id == id && url == URL
    ));
    assert_eq!(h.controller.get(id).await.unwrap().state, TransferState::Queued);

    h.transport
        .signal(h.transport.last_handle().await, TransportSignal::Accepted);
    wait_for_state(&mut rx, TransferState::Active).await;

    let stored = h.repo.stored(id).await.unwrap();
    assert_eq!(stored.state, TransferState::Active);
}

#[tokio::test]
async fn test_start_then_immediate_pause_reaches_paused() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let handle = h.transport.last_handle().await;

    h.controller.pause(id).await.unwrap();
    // Not paused until the checkpoint arrives.
    assert_eq!(h.controller.get(id).await.unwrap().state, TransferState::Queued);
    assert!(h.controller.get(id).await.unwrap().is_pause_pending());

    h.transport.signal(
        handle,
        TransportSignal::Checkpoint {
            token: Some(token(b"cp")),
        },
    );

    let paused = wait_for_state(&mut rx, TransferState::Paused).await;
    assert_eq!(paused.resume_token, Some(token(b"cp")));
    assert_eq!(
        h.repo.stored(id).await.unwrap().resume_token,
        Some(token(b"cp"))
    );
}

#[tokio::test]
async fn test_pause_is_idempotent_before_checkpoint() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let handle = h.transport.last_handle().await;
    h.transport.signal(handle, TransportSignal::Accepted);

    let (a, b) = tokio::join!(h.controller.pause(id), h.controller.pause(id));
    a.unwrap();
    b.unwrap();
    h.controller.pause(id).await.unwrap();

    assert_eq!(h.transport.cancel_count().await, 1);

    let mut rx = h.controller.subscribe(id).await.unwrap();
    h.transport
        .signal(handle, TransportSignal::Checkpoint { token: None });
    wait_for_state(&mut rx, TransferState::Paused).await;

    // Pausing a paused item is fine and asks for nothing.
    h.controller.pause(id).await.unwrap();
    assert_eq!(h.transport.cancel_count().await, 1);
}

#[tokio::test]
async fn test_resume_without_token_restarts_from_source() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let first = h.transport.last_handle().await;

    h.transport.signal(
        first,
        TransportSignal::Progress {
            bytes_written: 40,
            total_bytes: Some(100),
        },
    );
    wait_until(&mut rx, |item| item.bytes_written == 40).await;
    h.controller.pause(id).await.unwrap();
    h.transport
        .signal(first, TransportSignal::Checkpoint { token: None });
    wait_for_state(&mut rx, TransferState::Paused).await;

    h.controller.resume(id).await.unwrap();

    let second = h.transport.last_handle().await;
    assert_ne!(first, second);
    assert_eq!(
        h.transport.calls().await.last(),
        Some(&Call::Issue {
            transfer_id: id,
            handle: second,
            url: URL.to_string()
        })
    );
    let item = h.controller.get(id).await.unwrap();
    assert_eq!(item.state, TransferState::Active);
    assert_eq!(item.bytes_written, 0);
    assert!(item.progress_fraction.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_resume_with_token_issues_resumable_request() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let first = h.transport.last_handle().await;

    h.controller.pause(id).await.unwrap();
    h.transport.signal(
        first,
        TransportSignal::Checkpoint {
            token: Some(token(b"offset=40")),
        },
    );
    wait_for_state(&mut rx, TransferState::Paused).await;

    h.controller.resume(id).await.unwrap();

    let second = h.transport.last_handle().await;
    assert_eq!(
        h.transport.calls().await.last(),
        Some(&Call::Resumable {
            handle: second,
            token: token(b"offset=40")
        })
    );
    let item = h.controller.get(id).await.unwrap();
    assert!(item.resume_token.is_none());
    assert_eq!(item.state, TransferState::Active);
}

#[tokio::test]
async fn test_signals_from_superseded_attempt_are_ignored() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let first = h.transport.last_handle().await;

    h.controller.pause(id).await.unwrap();
    h.transport
        .signal(first, TransportSignal::Checkpoint { token: None });
    wait_for_state(&mut rx, TransferState::Paused).await;
    h.controller.resume(id).await.unwrap();
    let second = h.transport.last_handle().await;

    // A late completion from the first attempt must not finish the item.
    h.transport.signal(
        first,
        TransportSignal::Finished {
            local_temp_path: PathBuf::from("/tmp/stale.part"),
        },
    );
    h.transport.signal(
        second,
        TransportSignal::Progress {
            bytes_written: 10,
            total_bytes: Some(100),
        },
    );

    let item = wait_until(&mut rx, |item| item.bytes_written == 10).await;
    assert_eq!(item.state, TransferState::Active);
    assert!(item.local_path.is_none());
}

#[tokio::test]
async fn test_completion_stores_payload() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let handle = h.transport.last_handle().await;

    h.transport.signal(handle, TransportSignal::Accepted);
    h.transport.signal(
        handle,
        TransportSignal::Progress {
            bytes_written: 100,
            total_bytes: Some(100),
        },
    );
    h.transport.signal(
        handle,
        TransportSignal::Finished {
            local_temp_path: PathBuf::from("/tmp/h1.part"),
        },
    );

    let done = wait_for_state(&mut rx, TransferState::Completed).await;
    assert_eq!(done.local_path, Some(PathBuf::from("/downloads/h1.part")));
    assert!((done.progress_fraction - 1.0).abs() < f64::EPSILON);

    let stored = h.repo.stored(id).await.unwrap();
    assert_eq!(stored.state, TransferState::Completed);

    let events = h.emitter.events();
    assert!(events.iter().any(|e| matches!(e, TransferEvent::Progress { .. })));
    assert!(matches!(events.last(), Some(TransferEvent::Completed { .. })));
}

#[tokio::test]
async fn test_terminal_items_ignore_further_signals_and_commands() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let handle = h.transport.last_handle().await;

    h.transport.signal(
        handle,
        TransportSignal::Failed {
            error: TransferError::transport("reset by peer"),
        },
    );
    let failed = wait_for_state(&mut rx, TransferState::Failed).await;
    assert!(matches!(failed.error, Some(TransferError::Transport { .. })));

    h.transport.signal(
        handle,
        TransportSignal::Finished {
            local_temp_path: PathBuf::from("/tmp/h1.part"),
        },
    );
    tokio::task::yield_now().await;

    let pause = h.controller.pause(id).await;
    assert!(matches!(
        pause,
        Err(TransferError::InvalidState {
            state: TransferState::Failed,
            ..
        })
    ));
    let resume = h.controller.resume(id).await;
    assert!(matches!(resume, Err(TransferError::InvalidState { .. })));

    let item = h.controller.get(id).await.unwrap();
    assert_eq!(item.state, TransferState::Failed);
    assert!(item.local_path.is_none());
    // The rejected pause never reached the transport.
    assert_eq!(h.transport.cancel_count().await, 0);
}

#[tokio::test]
async fn test_progress_never_decreases() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let handle = h.transport.last_handle().await;

    for bytes in [10, 60, 40, 20, 55] {
        h.transport.signal(
            handle,
            TransportSignal::Progress {
                bytes_written: bytes,
                total_bytes: Some(100),
            },
        );
    }
    // Signals are handled in order, so once the checkpoint lands every
    // progress report before it has been applied.
    h.controller.pause(id).await.unwrap();
    h.transport
        .signal(handle, TransportSignal::Checkpoint { token: None });
    let item = wait_for_state(&mut rx, TransferState::Paused).await;

    assert!((item.progress_fraction - 0.6).abs() < f64::EPSILON);
    assert_eq!(item.bytes_written, 60);
}

#[tokio::test]
async fn test_storage_failure_fails_the_transfer() {
    let mut store = MockStore::new();
    store
        .expect_persist()
        .times(1)
        .returning(|_, _| Err(TransferError::storage("disk full")));

    let h = harness_with(ScriptedTransport::new(), MemoryRepo::default(), store);
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let handle = h.transport.last_handle().await;

    h.transport.signal(
        handle,
        TransportSignal::Finished {
            local_temp_path: PathBuf::from("/tmp/h1.part"),
        },
    );

    let failed = wait_for_state(&mut rx, TransferState::Failed).await;
    assert!(matches!(
        failed.error,
        Some(TransferError::Storage { ref message }) if message == "disk full"
    ));
    assert!(failed.local_path.is_none());
    assert!(matches!(
        h.emitter.events().last(),
        Some(TransferEvent::Failed { .. })
    ));
}

#[tokio::test]
async fn test_refused_request_fails_the_transfer() {
    let h = harness_with(ScriptedTransport::refusing(), MemoryRepo::default(), InstantStore);
    let id = h.controller.start(title(), URL).await.unwrap();

    let item = h.controller.get(id).await.unwrap();
    assert_eq!(item.state, TransferState::Failed);
    assert!(matches!(item.error, Some(TransferError::Transport { .. })));
}

#[tokio::test]
async fn test_completion_wins_over_pending_pause() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    let mut rx = h.controller.subscribe(id).await.unwrap();
    let handle = h.transport.last_handle().await;

    h.controller.pause(id).await.unwrap();
    h.transport.signal(
        handle,
        TransportSignal::Finished {
            local_temp_path: PathBuf::from("/tmp/h1.part"),
        },
    );
    h.transport.signal(
        handle,
        TransportSignal::Checkpoint {
            token: Some(token(b"late")),
        },
    );

    let done = wait_for_state(&mut rx, TransferState::Completed).await;
    assert!(done.resume_token.is_none());
}

#[tokio::test]
async fn test_transfers_proceed_independently() {
    let h = harness();
    let first = h.controller.start(title(), URL).await.unwrap();
    let first_handle = h.transport.last_handle().await;
    let second = h
        .controller
        .start(TitleId::parse("0100AAAAAAAAA000").unwrap(), URL)
        .await
        .unwrap();
    let second_handle = h.transport.last_handle().await;

    let mut first_rx = h.controller.subscribe(first).await.unwrap();
    let mut second_rx = h.controller.subscribe(second).await.unwrap();

    h.controller.pause(first).await.unwrap();
    h.transport.signal(
        second_handle,
        TransportSignal::Finished {
            local_temp_path: PathBuf::from("/tmp/h2.part"),
        },
    );
    wait_for_state(&mut second_rx, TransferState::Completed).await;

    h.transport
        .signal(first_handle, TransportSignal::Checkpoint { token: None });
    wait_for_state(&mut first_rx, TransferState::Paused).await;

    let all = h.controller.snapshot().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second);
}

#[tokio::test]
async fn test_restore_downgrades_interrupted_transfers() {
    let mut interrupted = TransferItem::new(title(), URL);
    interrupted.accept().unwrap();
    interrupted.record_progress(30, Some(100)).unwrap();

    let mut finished = TransferItem::new(title(), URL);
    finished.complete(PathBuf::from("/downloads/done.nsp")).unwrap();

    let repo = MemoryRepo::with(vec![interrupted.clone(), finished.clone()]);
    let h = harness_with(ScriptedTransport::new(), repo, InstantStore);

    assert_eq!(h.controller.restore().await.unwrap(), 2);
    // A second restore does not duplicate.
    assert_eq!(h.controller.restore().await.unwrap(), 0);

    let restored = h.controller.get(interrupted.id).await.unwrap();
    assert_eq!(restored.state, TransferState::Paused);
    assert!(restored.resume_token.is_none());
    assert_eq!(
        h.repo.stored(interrupted.id).await.unwrap().state,
        TransferState::Paused
    );
    assert_eq!(
        h.controller.get(finished.id).await.unwrap().state,
        TransferState::Completed
    );

    h.controller.resume(interrupted.id).await.unwrap();
    assert!(matches!(
        h.transport.calls().await.last(),
        Some(Call::Issue { url, .. }) if url == URL
    ));
    assert!(matches!(
        h.controller.resume(finished.id).await,
        Err(TransferError::InvalidState { .. })
    ));
}

#[tokio::test]
async fn test_unknown_transfer_is_not_found() {
    let h = harness();
    let missing = TransferId::new();

    assert!(matches!(
        h.controller.pause(missing).await,
        Err(TransferError::NotFound { .. })
    ));
    assert!(h.controller.subscribe(missing).await.is_err());
    assert!(h.controller.get(missing).await.is_none());
}

#[tokio::test]
async fn test_shutdown_rejects_new_work() {
    let h = harness();
    let id = h.controller.start(title(), URL).await.unwrap();
    h.controller.shutdown();

    assert!(matches!(
        h.controller.start(title(), URL).await,
        Err(TransferError::Shutdown)
    ));
    assert!(matches!(
        h.controller.pause(id).await,
        Err(TransferError::Shutdown)
    ));
    assert!(h.repo.saves.load(Ordering::SeqCst) >= 1);
}
