//! Show command handler.
//!
//! Prints one title, its artwork URLs and every catalog entry that shares
//! its base title. With `--remote` the detail API is queried as well.

use anyhow::Result;
use nxshelf_core::{CatalogTitle, TitleAssets, TitleDetail, TitleGroup};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::parse_title_id;
use crate::presentation::{format_date, truncate_string};

/// Execute the show command.
pub async fn execute(ctx: &CliContext, raw_id: &str, remote: bool) -> Result<()> {
    let id = parse_title_id(raw_id)?;
    let catalog = ctx.app().catalog();

    let local = catalog.get(&id).await.map_err(CliError::from)?;
    let group = catalog.related(&id).await.map_err(CliError::from)?;

    if local.is_none() && !remote {
        return Err(CliError::NotFound(format!(
            "{id} is not in the local catalog (run 'nxshelf refresh' or pass --remote)"
        ))
        .into());
    }

    match &local {
        Some(title) => {
            let listed = ctx
                .app()
                .wishlist()
                .contains(&id)
                .await
                .map_err(CliError::from)?;
            print_title(title, listed);
        }
        None => {
            println!("{id} ({}) is not in the local catalog.", id.role());
            println!("Base title: {}", id.base());
        }
    }

    print_assets(&TitleAssets::for_base(&ctx.asset_host, &group.base_id));
    print_group(&group);

    if remote {
        let detail = catalog.detail(&id).await.map_err(CliError::from)?;
        print_detail(&detail);
    }
    Ok(())
}

fn print_title(title: &CatalogTitle, on_wishlist: bool) {
    println!("{}", title.name);
    println!("  ID:        {}", title.id);
    println!("  Type:      {}", title.role());
    println!("  Base:      {}", title.base_id);
    println!("  Version:   {}", title.version);
    println!("  Size:      {}", title.formatted_size());
    println!("  Released:  {}", format_date(title.release_date));
    println!("  Wishlist:  {}", if on_wishlist { "yes" } else { "no" });
}

fn print_assets(assets: &TitleAssets) {
    println!();
    println!("Artwork:");
    println!("  Icon:      {}", assets.icon);
    println!("  Banner:    {}", assets.banner);
    for (n, url) in assets.screenshots.iter().enumerate() {
        println!("  Screen {}:  {url}", n + 1);
    }
}

fn print_group(group: &TitleGroup) {
    println!();
    match &group.base {
        Some(base) => println!("Base title: {} {}", base.id, base.name),
        None => println!("Base title: {} (not in catalog)", group.base_id),
    }
    print_members("Updates", &group.updates);
    print_members("DLC", &group.dlc);
}

fn print_members(heading: &str, members: &[CatalogTitle]) {
    if members.is_empty() {
        println!("{heading}: none");
        return;
    }
    println!("{heading}: {}", members.len());
    for title in members {
        println!(
            "  {:<18} {:<40} {:>11}",
            title.id,
            truncate_string(&title.name, 39),
            title.formatted_size()
        );
    }
}

fn print_detail(detail: &TitleDetail) {
    println!();
    println!("Remote details:");
    let fields = [
        ("Name", detail.name.clone()),
        ("Publisher", detail.publisher.clone()),
        ("Developer", detail.developer.clone()),
        ("Released", detail.release_date.clone()),
        ("Version", detail.version.map(|v| v.to_string())),
        ("Region", detail.region.clone()),
        ("Players", detail.number_of_players.map(|n| n.to_string())),
        ("Type", detail.kind.clone()),
        ("Rights ID", detail.rights_id.clone()),
        ("Intro", detail.intro.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {label:<10} {value}");
        }
    }
    for (label, values) in [
        ("Category", &detail.category),
        ("Languages", &detail.languages),
        ("Rating", &detail.rating_content),
    ] {
        if !values.is_empty() {
            println!("  {label:<10} {}", values.join(", "));
        }
    }
    if let Some(description) = &detail.description {
        println!();
        println!("{description}");
    }
}
