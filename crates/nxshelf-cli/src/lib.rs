//! The `nxshelf` command-line adapter.
//!
//! [`bootstrap`] wires the SQLite repositories, the catalog client and the
//! transfer controller together; [`handlers`] turn parsed [`Commands`] into
//! calls on that context and print the results.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, init_tracing};
pub use commands::{Commands, WishlistCommand};
pub use error::CliError;
pub use parser::Cli;
