//! Remote catalog client for nxshelf.
//!
//! Fetches the title list, the release-date table and per-title detail
//! metadata, and exposes them through `nxshelf_core::CatalogSourcePort`.
//!
//! ```no_run
//! use nxshelf_catalog::{CatalogClientConfig, DefaultCatalogClient};
//!
//! let client = DefaultCatalogClient::new(CatalogClientConfig::default())?;
//! # Ok::<(), nxshelf_catalog::ClientError>(())
//! ```

#![deny(unsafe_code)]
// DefaultCatalogClient is meant to be used through CatalogSourcePort,
// not its internal generic structure
#![allow(private_interfaces, private_bounds)]

mod client;
mod config;
mod error;
mod http;
mod parsing;
mod port;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultCatalogClient;

// Configuration
pub use config::{CatalogClientConfig, DEFAULT_RELEASE_DATES_URL, DEFAULT_TITLES_URL};

// Errors
pub use error::ClientError;
