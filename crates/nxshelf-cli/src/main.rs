//! CLI entry point.
//!
//! Parses arguments, installs logging, composes the context through
//! [`bootstrap`] and routes each command to its handler. Commands that need
//! neither the database nor the network run before bootstrap.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use nxshelf_cli::handlers::{self, list::ListArgs};
use nxshelf_cli::{Cli, CliConfig, CliError, Commands, bootstrap, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match &command {
        Commands::Paths => return handlers::paths::execute(),
        Commands::Classify { ids } => return handlers::classify::execute(ids),
        _ => {}
    }

    let ctx = bootstrap(config).await?;

    match command {
        Commands::Refresh => handlers::refresh::execute(&ctx).await,
        Commands::List {
            search,
            sort,
            page,
            page_size,
        } => {
            let args = ListArgs {
                search,
                sort,
                page,
                page_size,
            };
            handlers::list::execute(&ctx, args).await
        }
        Commands::Show { id, remote } => handlers::show::execute(&ctx, &id, remote).await,
        Commands::Wishlist { command } => handlers::wishlist::execute(&ctx, command).await,
        Commands::Download { id, url } => handlers::transfers::download(&ctx, &id, &url).await,
        Commands::Resume { transfer_id } => handlers::transfers::resume(&ctx, &transfer_id).await,
        Commands::Transfers => handlers::transfers::list(&ctx).await,
        Commands::Paths | Commands::Classify { .. } => Ok(()),
    }
}
