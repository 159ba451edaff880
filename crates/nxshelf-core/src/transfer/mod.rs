//! Transfer domain types, events, errors, and the per-item state machine.
//!
//! This module contains pure data types and transition rules for the
//! transfer system. No I/O, networking, or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - Identifiers, states, resume tokens
//! - `item` - `TransferItem` and its transitions
//! - `events` - Events published to subscribers
//! - `errors` - Error types for transfer operations
//! - `notification` - Messages the transport sends back

pub mod errors;
pub mod events;
pub mod item;
pub mod notification;
pub mod types;

pub use errors::{TransferError, TransferResult};
pub use events::TransferEvent;
pub use item::{PauseDecision, ResumePlan, TransferItem};
pub use notification::{TransportNotification, TransportSignal};
pub use types::{ResumeToken, TransferId, TransferState, TransportHandle};
