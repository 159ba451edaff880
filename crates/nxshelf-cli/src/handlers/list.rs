//! List command handler.
//!
//! Displays one page of the local catalog in a formatted table.

use std::fmt::Write;

use anyhow::Result;
use nxshelf_core::{CatalogQuery, CatalogSort, TitlePage};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{format_date, print_separator, truncate_string};

/// Arguments for the list command.
pub struct ListArgs {
    pub search: Option<String>,
    pub sort: CatalogSort,
    /// One-based page number as typed by the user.
    pub page: u32,
    pub page_size: u32,
}

impl ListArgs {
    fn query(&self) -> CatalogQuery {
        let mut query = CatalogQuery::default()
            .with_sort(self.sort)
            .with_page(self.page.saturating_sub(1))
            .with_page_size(self.page_size);
        if let Some(search) = &self.search {
            query = query.with_search(search.clone());
        }
        query
    }
}

/// Execute the list command.
pub async fn execute(ctx: &CliContext, args: ListArgs) -> Result<()> {
    let query = args.query();
    let page = ctx
        .app()
        .catalog()
        .page(&query)
        .await
        .map_err(CliError::from)?;

    if page.items.is_empty() {
        if page.total > 0 {
            println!("Page {} is past the end ({} match(es)).", args.page, page.total);
        } else if query.search_term().is_some() {
            println!("No titles match that search.");
        } else {
            println!("The catalog is empty.");
            println!("Use 'nxshelf refresh' to download it.");
        }
        return Ok(());
    }

    println!(
        "{:<18} {:<40} {:<7} {:<10} {:>11} {:<10}",
        "ID", "Name", "Type", "Version", "Size", "Released"
    );
    print_separator(101);

    for title in &page.items {
        println!(
            "{:<18} {:<40} {:<7} {:<10} {:>11} {:<10}",
            title.id,
            truncate_string(&title.name, 39),
            title.role(),
            truncate_string(&title.version, 9),
            title.formatted_size(),
            format_date(title.release_date),
        );
    }

    println!();
    println!("{}", footer(&page, query.sort));
    Ok(())
}

fn footer(page: &TitlePage, sort: CatalogSort) -> String {
    let first = u64::from(page.page) * u64::from(page.page_size) + 1;
    let last = first + page.items.len() as u64 - 1;
    let mut line = format!(
        "Showing {first}-{last} of {} ({}).",
        page.total,
        sort.label()
    );
    if page.has_more {
        let _ = write!(line, " Next: --page {}", page.page + 2);
    }
    line
}
