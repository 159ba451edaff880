//! `SQLite` adapters for the nxshelf repository ports.
//!
//! Call [`setup_database`] with the resolved database path, then hand the
//! pool to [`CoreFactory::build_repos`].

#![deny(unsafe_code)]

// Linked for its bundled SQLite build; not referenced directly.
use libsqlite3_sys as _;

pub mod factory;
pub mod repositories;
pub mod setup;

pub use factory::CoreFactory;

pub use repositories::{
    SqliteTitleRepository, SqliteTransferRepository, SqliteWishlistRepository,
};

pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
