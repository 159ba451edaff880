//! Transfer error types.
//!
//! These errors are serializable and do not depend on external error types
//! like `std::io::Error`. For I/O errors, the kind and message are captured
//! as strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::TransferState;

/// Error type for transfer operations.
///
/// Stored on failed items and shown to the user, so it stays serializable.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferError {
    /// Network or protocol failure. Terminal for the attempt.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// HTTP status code if available.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// The payload arrived but could not be written to its final location.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// No transfer with this id.
    #[error("Transfer not found: {id}")]
    NotFound { id: String },

    /// The operation is not valid in the item's current state.
    #[error("Cannot {operation} a transfer that is {state}")]
    InvalidState {
        operation: String,
        state: TransferState,
    },

    /// Saving the transfer record failed.
    #[error("Repository error: {message}")]
    Repository { message: String },

    /// The controller has shut down.
    #[error("Transfer controller is shut down")]
    Shutdown,
}

impl TransferError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a transport error with HTTP status code.
    pub fn transport_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Transport {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a storage error from a `std::io::Error`, keeping its kind.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Storage {
            message: format!("{:?}: {err}", err.kind()),
        }
    }

    /// Create a not found error.
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Create an invalid state error.
    pub fn invalid_state(operation: impl Into<String>, state: TransferState) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            state,
        }
    }

    /// Create a repository error.
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
        }
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport {
                message,
                status_code: Some(code),
            } => format!("Download failed (HTTP {code}): {message}"),
            Self::Transport { message, .. } => format!("Download failed: {message}"),
            Self::Storage { message } => {
                format!("Download finished but could not be saved: {message}")
            }
            Self::NotFound { id } => format!("No download with id '{id}'."),
            Self::InvalidState { operation, state } => {
                format!("Cannot {operation} a download that is {state}.")
            }
            Self::Repository { message } => format!("Could not record download state: {message}"),
            Self::Shutdown => "The download manager has stopped.".to_string(),
        }
    }
}

/// Convenience result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;
