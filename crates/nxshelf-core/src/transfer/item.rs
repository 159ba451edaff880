//! The transfer record and its state machine.
//!
//! `TransferItem` is plain data plus the transition rules. It performs no
//! I/O: the controller calls these methods from the single task that owns
//! the item and carries out the side effects (transport requests, saves,
//! events) that each successful transition asks for.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{TransferError, TransferResult};
use super::types::{ResumeToken, TransferId, TransferState};
use crate::domain::TitleId;

/// One in-flight or historical transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferItem {
    pub id: TransferId,
    /// Catalog entry being fetched.
    pub source_id: TitleId,
    /// Where the payload is fetched from; used again when resuming without a token.
    pub source_url: String,
    pub state: TransferState,
    /// In `[0, 1]`. Never decreases while Active.
    pub progress_fraction: f64,
    pub bytes_written: u64,
    pub total_bytes: Option<u64>,
    /// Present only while Paused.
    pub resume_token: Option<ResumeToken>,
    /// Set only on entering Completed.
    pub local_path: Option<PathBuf>,
    /// Set only on entering Failed.
    pub error: Option<TransferError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// A checkpoint has been requested and not yet delivered.
    #[serde(skip)]
    pause_pending: bool,
}

/// What the owner must do after [`TransferItem::request_pause`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseDecision {
    /// Ask the transport for a checkpoint.
    RequestCheckpoint,
    /// A checkpoint request is already outstanding.
    AlreadyRequested,
    /// The item is already paused.
    AlreadyPaused,
}

/// How the owner must restart the transport after [`TransferItem::resume`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResumePlan {
    /// Continue from the checkpoint.
    FromCheckpoint(ResumeToken),
    /// No checkpoint: fetch again from the source URL.
    Fresh { url: String },
}

impl TransferItem {
    /// A new Queued transfer.
    pub fn new(source_id: TitleId, source_url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TransferId::new(),
            source_id,
            source_url: source_url.into(),
            state: TransferState::Queued,
            progress_fraction: 0.0,
            bytes_written: 0,
            total_bytes: None,
            resume_token: None,
            local_path: None,
            error: None,
            created_at: now,
            updated_at: now,
            pause_pending: false,
        }
    }

    /// Whether a checkpoint request is outstanding.
    #[must_use]
    pub const fn is_pause_pending(&self) -> bool {
        self.pause_pending
    }

    /// Transport accepted the request. Returns `true` on Queued -> Active.
    pub fn accept(&mut self) -> TransferResult<bool> {
        match self.state {
            TransferState::Queued => {
                self.enter(TransferState::Active);
                Ok(true)
            }
            TransferState::Active => Ok(false),
            state => Err(TransferError::invalid_state("accept", state)),
        }
    }

    /// Apply a progress notification. Returns `true` if the fraction moved.
    ///
    /// Progress on a Queued item implies acceptance. The byte counter always
    /// follows the current attempt, which may have restarted from zero; the
    /// fraction only moves forward.
    #[allow(clippy::cast_precision_loss)]
    pub fn record_progress(
        &mut self,
        bytes_written: u64,
        total_bytes: Option<u64>,
    ) -> TransferResult<bool> {
        match self.state {
            TransferState::Queued => {
                self.enter(TransferState::Active);
            }
            TransferState::Active => {}
            state => return Err(TransferError::invalid_state("update", state)),
        }

        self.bytes_written = bytes_written;
        if let Some(total) = total_bytes.filter(|t| *t > 0) {
            self.total_bytes = Some(total);
        }

        let Some(total) = self.total_bytes else {
            return Ok(false);
        };
        let fraction = (bytes_written as f64 / total as f64).clamp(0.0, 1.0);
        if fraction > self.progress_fraction {
            self.progress_fraction = fraction;
            self.updated_at = Utc::now();
            return Ok(true);
        }
        Ok(false)
    }

    /// Ask to pause. At most one checkpoint request is outstanding per item.
    pub fn request_pause(&mut self) -> TransferResult<PauseDecision> {
        match self.state {
            TransferState::Queued | TransferState::Active if self.pause_pending => {
                Ok(PauseDecision::AlreadyRequested)
            }
            TransferState::Queued | TransferState::Active => {
                self.pause_pending = true;
                Ok(PauseDecision::RequestCheckpoint)
            }
            TransferState::Paused => Ok(PauseDecision::AlreadyPaused),
            state => Err(TransferError::invalid_state("pause", state)),
        }
    }

    /// The requested checkpoint arrived. Moves to Paused.
    pub fn checkpoint(&mut self, token: Option<ResumeToken>) -> TransferResult<()> {
        match self.state {
            TransferState::Queued | TransferState::Active if self.pause_pending => {
                self.pause_pending = false;
                self.resume_token = token;
                self.enter(TransferState::Paused);
                Ok(())
            }
            state => Err(TransferError::invalid_state("checkpoint", state)),
        }
    }

    /// Leave Paused. Consumes the resume token.
    ///
    /// Without a token the transfer starts over, so progress resets.
    pub fn resume(&mut self) -> TransferResult<ResumePlan> {
        if self.state != TransferState::Paused {
            return Err(TransferError::invalid_state("resume", self.state));
        }
        let plan = match self.resume_token.take() {
            Some(token) => ResumePlan::FromCheckpoint(token),
            None => {
                self.progress_fraction = 0.0;
                self.bytes_written = 0;
                ResumePlan::Fresh {
                    url: self.source_url.clone(),
                }
            }
        };
        self.enter(TransferState::Active);
        Ok(plan)
    }

    /// The payload is stored at `local_path`.
    pub fn complete(&mut self, local_path: PathBuf) -> TransferResult<()> {
        match self.state {
            TransferState::Queued | TransferState::Active => {
                self.pause_pending = false;
                self.progress_fraction = 1.0;
                if let Some(total) = self.total_bytes {
                    self.bytes_written = total;
                }
                self.local_path = Some(local_path);
                self.enter(TransferState::Completed);
                Ok(())
            }
            state => Err(TransferError::invalid_state("complete", state)),
        }
    }

    /// Record a terminal failure.
    pub fn fail(&mut self, error: TransferError) -> TransferResult<()> {
        if self.state.is_terminal() {
            return Err(TransferError::invalid_state("fail", self.state));
        }
        self.pause_pending = false;
        self.resume_token = None;
        self.error = Some(error);
        self.enter(TransferState::Failed);
        Ok(())
    }

    /// Downgrade an item whose transport attempt was lost (process restart).
    ///
    /// Queued and Active items become Paused without a token. Returns `true`
    /// if the item changed.
    pub fn interrupt(&mut self) -> bool {
        match self.state {
            TransferState::Queued | TransferState::Active => {
                self.pause_pending = false;
                self.resume_token = None;
                self.enter(TransferState::Paused);
                true
            }
            _ => false,
        }
    }

    fn enter(&mut self, state: TransferState) {
        self.state = state;
        self.updated_at = Utc::now();
    }
}
