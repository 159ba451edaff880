//! Messages a transport sends back about an attempt.

use std::path::PathBuf;

use super::errors::TransferError;
use super::types::{ResumeToken, TransportHandle};

/// A signal about one transport attempt.
///
/// Per handle, signals arrive in the order the transport observed them:
/// progress strictly before the terminal `Finished`/`Failed`/`Checkpoint`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportNotification {
    pub handle: TransportHandle,
    pub signal: TransportSignal,
}

impl TransportNotification {
    pub const fn new(handle: TransportHandle, signal: TransportSignal) -> Self {
        Self { handle, signal }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransportSignal {
    /// The remote accepted the request and bytes will follow.
    Accepted,
    Progress {
        bytes_written: u64,
        total_bytes: Option<u64>,
    },
    /// All bytes are in a temporary file.
    Finished { local_temp_path: PathBuf },
    Failed { error: TransferError },
    /// Answer to `cancel_with_checkpoint`. `None` when nothing can be resumed.
    Checkpoint { token: Option<ResumeToken> },
}
