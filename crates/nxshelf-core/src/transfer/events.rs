//! Transfer events - discriminated union for all transfer state changes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::TransferError;
use super::item::TransferItem;
use super::types::{TransferId, TransferState};

/// Single discriminated union for all transfer events.
///
/// ```json
/// { "type": "state_changed", "id": "…", "state": "paused" }
/// { "type": "progress", "id": "…", "fraction": 0.42, "bytes_written": 420, "total_bytes": 1000 }
/// { "type": "completed", "id": "…", "local_path": "/…/title.nsp" }
/// { "type": "failed", "id": "…", "error": { "kind": "storage", "message": "…" } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferEvent {
    /// The item entered a new non-terminal state.
    StateChanged { id: TransferId, state: TransferState },

    /// Progress moved forward.
    Progress {
        id: TransferId,
        fraction: f64,
        bytes_written: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_bytes: Option<u64>,
    },

    /// The payload is stored.
    Completed { id: TransferId, local_path: PathBuf },

    /// The transfer failed for good.
    Failed { id: TransferId, error: TransferError },
}

impl TransferEvent {
    /// The event describing `item`'s current state.
    pub fn for_state(item: &TransferItem) -> Self {
        match (item.state, &item.local_path, &item.error) {
            (TransferState::Completed, Some(path), _) => Self::Completed {
                id: item.id,
                local_path: path.clone(),
            },
            (TransferState::Failed, _, Some(error)) => Self::Failed {
                id: item.id,
                error: error.clone(),
            },
            (state, _, _) => Self::StateChanged { id: item.id, state },
        }
    }

    /// The event describing `item`'s current progress.
    pub const fn progress(item: &TransferItem) -> Self {
        Self::Progress {
            id: item.id,
            fraction: item.progress_fraction,
            bytes_written: item.bytes_written,
            total_bytes: item.total_bytes,
        }
    }

    /// Id of the transfer this event is about.
    pub const fn transfer_id(&self) -> TransferId {
        match self {
            Self::StateChanged { id, .. }
            | Self::Progress { id, .. }
            | Self::Completed { id, .. }
            | Self::Failed { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TitleId;

    #[test]
    fn test_for_state_picks_terminal_variants() {
        let mut item = TransferItem::new(TitleId::parse("0100000000001000").unwrap(), "u");
        assert!(matches!(
            TransferEvent::for_state(&item),
            TransferEvent::StateChanged {
                state: TransferState::Queued,
                ..
            }
        ));

        item.fail(TransferError::transport("reset")).unwrap();
        let event = TransferEvent::for_state(&item);
        assert_eq!(event.transfer_id(), item.id);
        assert!(matches!(event, TransferEvent::Failed { .. }));
    }

    #[test]
    fn test_event_tagging() {
        let id = TransferId::new();
        let json = serde_json::to_value(TransferEvent::StateChanged {
            id,
            state: TransferState::Paused,
        })
        .unwrap();
        assert_eq!(json["type"], "state_changed");
        assert_eq!(json["state"], "paused");
    }
}
