//! Wishlist command handlers.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::commands::WishlistCommand;
use crate::error::CliError;
use crate::handlers::parse_title_id;
use crate::presentation::{print_separator, truncate_string};

/// Dispatch a wishlist subcommand.
pub async fn execute(ctx: &CliContext, command: WishlistCommand) -> Result<()> {
    match command {
        WishlistCommand::Add { id } => add(ctx, &id).await,
        WishlistCommand::Remove { id } => remove(ctx, &id).await,
        WishlistCommand::List => list(ctx).await,
    }
}

/// Add a catalog title to the wishlist.
pub async fn add(ctx: &CliContext, raw_id: &str) -> Result<()> {
    let id = parse_title_id(raw_id)?;
    let added = ctx
        .app()
        .wishlist()
        .add(&id)
        .await
        .map_err(CliError::from)?;

    if added {
        println!("Added {id} to the wishlist.");
    } else {
        println!("{id} is already on the wishlist.");
    }
    Ok(())
}

/// Remove a title from the wishlist.
pub async fn remove(ctx: &CliContext, raw_id: &str) -> Result<()> {
    let id = parse_title_id(raw_id)?;
    let removed = ctx
        .app()
        .wishlist()
        .remove(&id)
        .await
        .map_err(CliError::from)?;

    if removed {
        println!("Removed {id} from the wishlist.");
    } else {
        println!("{id} was not on the wishlist.");
    }
    Ok(())
}

/// List wishlist entries, newest first.
pub async fn list(ctx: &CliContext) -> Result<()> {
    let entries = ctx.app().wishlist().list().await.map_err(CliError::from)?;

    if entries.is_empty() {
        println!("The wishlist is empty.");
        println!("Use 'nxshelf wishlist add <ID>' to add a title.");
        return Ok(());
    }

    println!("{:<18} {:<40} Added", "ID", "Name");
    print_separator(80);
    for entry in entries {
        println!(
            "{:<18} {:<40} {}",
            entry.title_id,
            truncate_string(&entry.name, 39),
            entry.added_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
