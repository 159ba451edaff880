//! Main CLI parser and top-level argument handling.
//!
//! Global options select verbosity and override the catalog endpoints.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the title catalog and downloader.
#[derive(Parser)]
#[command(name = "nxshelf")]
#[command(about = "Browse the title catalog, keep a wishlist, and download payloads")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// URL of the title list document
    #[arg(long = "titles-url", env = "NXSHELF_TITLES_URL", global = true)]
    pub titles_url: Option<String>,

    /// URL of the release-date table
    #[arg(
        long = "release-dates-url",
        env = "NXSHELF_RELEASE_DATES_URL",
        global = true
    )]
    pub release_dates_url: Option<String>,

    /// Base URL of the title detail and artwork API
    #[arg(long = "api-base", env = "NXSHELF_API_BASE", global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "nxshelf",
            "--verbose",
            "--api-base",
            "http://localhost:9000/nx",
            "refresh",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:9000/nx"));
        assert!(matches!(cli.command, Some(Commands::Refresh)));
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from(["nxshelf", "transfers", "-v"]);
        assert!(cli.verbose);
    }
}
