//! CLI bootstrap - the composition root.
//!
//! This module is the only place where infrastructure is wired together
//! for the CLI adapter:
//! - Database pool and repositories (via nxshelf-db)
//! - Catalog client (via nxshelf-catalog)
//! - HTTP transport, payload store and transfer controller (via nxshelf-transfer)
//!
//! Command handlers receive the composed [`CliContext`] and delegate to it.

use std::sync::Arc;

use anyhow::{Context, Result};
use nxshelf_catalog::{CatalogClientConfig, DefaultCatalogClient};
use nxshelf_core::ports::{CatalogSourcePort, Repos, TransferRepositoryPort};
use nxshelf_core::services::AppCore;
use nxshelf_core::{NoopTransferEmitter, ResolvedPaths};
use nxshelf_db::{CoreFactory, setup_database};
use nxshelf_transfer::{
    FsPayloadStore, HttpTransport, TransferController, TransferControllerDeps,
    build_transfer_controller,
};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Remote catalog endpoints.
    pub catalog: CatalogClientConfig,
}

impl CliConfig {
    /// Apply endpoint overrides from flags or their environment variables.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut catalog = CatalogClientConfig::default();
        if let Some(url) = &cli.titles_url {
            catalog = catalog.with_titles_url(url);
        }
        if let Some(url) = &cli.release_dates_url {
            catalog = catalog.with_release_dates_url(url);
        }
        if let Some(url) = &cli.api_base {
            catalog = catalog.with_api_base(url);
        }
        Self { catalog }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Catalog and wishlist services.
    pub app: AppCore,
    /// Owns every transfer for the lifetime of the process.
    pub transfers: TransferController,
    /// Resolved data locations.
    pub paths: ResolvedPaths,
    /// Host serving title artwork.
    pub asset_host: String,
}

impl CliContext {
    /// Access the `AppCore`.
    pub const fn app(&self) -> &AppCore {
        &self.app
    }

    /// Access the transfer controller.
    pub const fn transfers(&self) -> &TransferController {
        &self.transfers
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug` and the
/// default is `warn`. Output goes to stderr so it never mixes with tables.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Bootstrap the CLI application.
///
/// Opens the database under the resolved data root, builds the catalog
/// client from `config`, and restores transfers recorded by earlier runs.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let paths = ResolvedPaths::resolve().map_err(CliError::from)?;
    let pool = setup_database(&paths.database_path).await?;

    let asset_host = config.catalog.api_base().to_string();
    let client = DefaultCatalogClient::new(config.catalog)
        .map_err(|e| CliError::Config(e.to_string()))
        .context("Failed to create catalog client")?;

    let repos = CoreFactory::build_repos(pool.clone());
    let transfer_repo = CoreFactory::transfer_repository(pool);

    bootstrap_with(repos, transfer_repo, Arc::new(client), paths, asset_host).await
}

/// Bootstrap with caller-supplied repositories and catalog source.
///
/// `transfer_repo` backs the transfer controller; `repos` backs `AppCore`.
pub async fn bootstrap_with<R>(
    repos: Repos,
    transfer_repo: Arc<R>,
    source: Arc<dyn CatalogSourcePort>,
    paths: ResolvedPaths,
    asset_host: String,
) -> Result<CliContext>
where
    R: TransferRepositoryPort + 'static,
{
    let app = AppCore::new(repos, source);

    let (transport, notifications) =
        HttpTransport::with_channel(&paths.partial_dir).map_err(CliError::from)?;

    let transfers = build_transfer_controller(TransferControllerDeps {
        transport: Arc::new(transport),
        notifications,
        repo: transfer_repo,
        payloads: Arc::new(FsPayloadStore::new(&paths.downloads_dir)),
        emitter: Arc::new(NoopTransferEmitter::new()),
    });

    let restored = transfers
        .restore()
        .await
        .map_err(CliError::from)
        .context("Failed to load saved transfers")?;
    tracing::debug!(target: "nxshelf.transfer", restored, "Transfers restored");

    Ok(CliContext {
        app,
        transfers,
        paths,
        asset_host,
    })
}
