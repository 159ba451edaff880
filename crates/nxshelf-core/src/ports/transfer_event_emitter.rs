//! Transfer event emitter port.
//!
//! This port abstracts event emission, allowing the transfer controller to
//! publish state changes without coupling to how a UI consumes them.

use tokio::sync::broadcast;

use crate::transfer::TransferEvent;

/// Port for emitting transfer events.
///
/// Implementations must not block.
pub trait TransferEventEmitterPort: Send + Sync {
    /// Emit a transfer event.
    fn emit(&self, event: TransferEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort>;
}

/// Discards all events. For tests and callers that poll snapshots instead.
#[derive(Debug, Clone, Default)]
pub struct NoopTransferEmitter;

impl NoopTransferEmitter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TransferEventEmitterPort for NoopTransferEmitter {
    fn emit(&self, _event: TransferEvent) {}

    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort> {
        Box::new(self.clone())
    }
}

/// Fans events out to any number of subscribers.
///
/// Slow subscribers lose the oldest events (`RecvError::Lagged`) rather than
/// blocking the controller.
#[derive(Debug, Clone)]
pub struct BroadcastTransferEmitter {
    sender: broadcast::Sender<TransferEvent>,
}

impl BroadcastTransferEmitter {
    /// Create an emitter buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Start receiving events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TransferEvent> {
        self.sender.subscribe()
    }
}

impl TransferEventEmitterPort for BroadcastTransferEmitter {
    fn emit(&self, event: TransferEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }

    fn clone_box(&self) -> Box<dyn TransferEventEmitterPort> {
        Box::new(self.clone())
    }
}
