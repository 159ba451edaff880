//! CLI error type and exit codes.
//!
//! Library errors are folded into [`CliError`] at the handler boundary so
//! `main` can pick an exit code without knowing where the failure came from.

use nxshelf_core::{CatalogError, CoreError, PathError, RepositoryError, TransferError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Unclassified failure.
    #[error("{0}")]
    Core(String),

    /// Bad identifier or argument value.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The named title, entry or transfer does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(String),

    /// Path or endpoint configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// The remote catalog could not be reached or decoded.
    #[error("Catalog error: {0}")]
    Network(String),

    /// A transfer ended in Failed, or a transfer command was refused.
    #[error("{0}")]
    Transfer(String),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Specific categories from sysexits.h
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) | Self::Transfer(_) => 1,
            Self::Arguments(_) => 2,
            Self::NotFound(_) => 66, // EX_NOINPUT
            Self::Network(_) => 69,  // EX_UNAVAILABLE
            Self::Database(_) => 73, // EX_CANTCREAT (closest fit)
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(RepositoryError::NotFound(what)) => {
                Self::NotFound(format!("Not found: {what}"))
            }
            CoreError::Repository(repo_err) => Self::Database(repo_err.to_string()),
            CoreError::Catalog(CatalogError::NotFound { id }) => {
                Self::NotFound(format!("The catalog has no details for {id}"))
            }
            CoreError::Catalog(catalog_err) => Self::Network(catalog_err.to_string()),
            CoreError::TitleId(id_err) => Self::Arguments(id_err.to_string()),
            CoreError::Validation(msg) => Self::Arguments(msg),
        }
    }
}

impl From<TransferError> for CliError {
    fn from(err: TransferError) -> Self {
        let message = err.user_message();
        match err {
            TransferError::NotFound { .. } => Self::NotFound(message),
            TransferError::Storage { .. } => Self::Io(message),
            TransferError::Repository { .. } => Self::Database(message),
            TransferError::Transport { .. }
            | TransferError::InvalidState { .. }
            | TransferError::Shutdown => Self::Transfer(message),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
