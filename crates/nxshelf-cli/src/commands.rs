//! Subcommand definitions.

use clap::Subcommand;
use nxshelf_core::{CatalogSort, DEFAULT_PAGE_SIZE};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Download the remote catalog and replace the local copy
    Refresh,

    /// List catalog titles, one page at a time
    List {
        /// Only titles whose name contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
        /// Sort order: name-asc, name-desc, date-asc, date-desc, size-asc, size-desc
        #[arg(long, default_value = "date-desc", value_parser = parse_sort)]
        sort: CatalogSort,
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Titles per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: u32,
    },

    /// Show a title together with its updates and add-on content
    Show {
        /// Title identifier
        id: String,
        /// Also fetch extended metadata from the detail API
        #[arg(long)]
        remote: bool,
    },

    /// Report the role and base title of one or more identifiers
    Classify {
        /// Identifiers to classify
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommand,
    },

    /// Download a title's payload, showing progress (Ctrl-C pauses)
    Download {
        /// Title identifier
        id: String,
        /// Source URL of the payload
        #[arg(long)]
        url: String,
    },

    /// Resume a paused transfer
    Resume {
        /// Transfer id as printed by `download` or `transfers`
        transfer_id: String,
    },

    /// List known transfers
    Transfers,

    /// Show resolved data, database and download paths
    Paths,
}

/// Wishlist subcommands.
#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Add a catalog title
    Add {
        /// Title identifier
        id: String,
    },
    /// Remove a title
    Remove {
        /// Title identifier
        id: String,
    },
    /// List wishlist entries, newest first
    List,
}

fn parse_sort(raw: &str) -> Result<CatalogSort, String> {
    CatalogSort::parse(raw).ok_or_else(|| {
        let valid: Vec<&str> = CatalogSort::ALL.iter().map(CatalogSort::as_str).collect();
        format!("unknown sort '{raw}' (expected one of: {})", valid.join(", "))
    })
}
