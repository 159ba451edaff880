//! Transfer command handlers: `download`, `resume` and `transfers`.
//!
//! `download` and `resume` stay attached to the transfer and draw progress
//! until it settles. Ctrl-C asks the controller to pause and then waits
//! for the checkpoint, so the partial file can be resumed by a later run.

use anyhow::Result;
use indicatif::HumanBytes;
use nxshelf_core::{TransferId, TransferItem, TransferState};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::parse_title_id;
use crate::presentation::{TransferProgress, print_separator, truncate_string};

/// Start downloading `url` for the catalog title `raw_id`.
pub async fn download(ctx: &CliContext, raw_id: &str, url: &str) -> Result<()> {
    let title_id = parse_title_id(raw_id)?;
    let label = ctx
        .app()
        .catalog()
        .get(&title_id)
        .await
        .map_err(CliError::from)?
        .map_or_else(|| title_id.to_string(), |title| title.name);

    let id = ctx
        .transfers()
        .start(title_id, url)
        .await
        .map_err(CliError::from)?;
    println!("Transfer {id} started.");

    follow(ctx, id, &label).await
}

/// Resume a paused transfer and follow it.
pub async fn resume(ctx: &CliContext, raw_id: &str) -> Result<()> {
    let id: TransferId = raw_id
        .trim()
        .parse()
        .map_err(|e| CliError::Arguments(format!("'{raw_id}' is not a transfer id: {e}")))?;

    ctx.transfers().resume(id).await.map_err(CliError::from)?;
    let label = ctx
        .transfers()
        .get(id)
        .await
        .map_or_else(|| id.to_string(), |item| item.source_id.to_string());
    println!("Transfer {id} resumed.");

    follow(ctx, id, &label).await
}

/// List every known transfer, newest first.
pub async fn list(ctx: &CliContext) -> Result<()> {
    let items = ctx.transfers().snapshot().await;

    if items.is_empty() {
        println!("No transfers.");
        return Ok(());
    }

    println!(
        "{:<36} {:<18} {:<9} {:>6}  Detail",
        "Transfer", "Title", "State", "Done"
    );
    print_separator(100);
    for item in &items {
        println!(
            "{:<36} {:<18} {:<9} {:>5.1}%  {}",
            item.id.to_string(),
            item.source_id,
            item.state,
            item.progress_fraction * 100.0,
            truncate_string(&detail(item), 40)
        );
    }
    Ok(())
}

/// Draw progress until the transfer is Paused, Completed or Failed.
async fn follow(ctx: &CliContext, id: TransferId, label: &str) -> Result<()> {
    let mut snapshots = ctx.transfers().subscribe(id).await.map_err(CliError::from)?;
    let mut progress = TransferProgress::new(label);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut pausing = false;

    let item = loop {
        let item = snapshots.borrow_and_update().clone();
        if is_settled(item.state) {
            break item;
        }
        progress.update(&item);

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break snapshots.borrow().clone();
                }
            }
            _ = &mut ctrl_c, if !pausing => {
                pausing = true;
                progress.set_message("Pausing...");
                if let Err(err) = ctx.transfers().pause(id).await {
                    // Usually the transfer finished first; the next snapshot says so.
                    tracing::debug!(target: "nxshelf.transfer", %id, %err, "Pause refused");
                }
            }
        }
    };

    progress.finish();
    report(&item)
}

const fn is_settled(state: TransferState) -> bool {
    matches!(state, TransferState::Paused) || state.is_terminal()
}

fn report(item: &TransferItem) -> Result<()> {
    match item.state {
        TransferState::Completed => {
            if let Some(path) = &item.local_path {
                println!("Saved to {}", path.display());
            }
            Ok(())
        }
        TransferState::Paused => {
            println!(
                "Paused at {}. Resume with: nxshelf resume {}",
                HumanBytes(item.bytes_written),
                item.id
            );
            Ok(())
        }
        TransferState::Failed => {
            let message = item
                .error
                .as_ref()
                .map_or_else(|| "Download failed.".to_string(), |e| e.user_message());
            Err(CliError::Transfer(message).into())
        }
        TransferState::Queued | TransferState::Active => Ok(()),
    }
}

fn detail(item: &TransferItem) -> String {
    match item.state {
        TransferState::Completed => item
            .local_path
            .as_ref()
            .map_or_else(String::new, |p| p.display().to_string()),
        TransferState::Failed => item
            .error
            .as_ref()
            .map_or_else(String::new, ToString::to_string),
        _ => match item.total_bytes {
            Some(total) => format!("{} / {}", HumanBytes(item.bytes_written), HumanBytes(total)),
            None => HumanBytes(item.bytes_written).to_string(),
        },
    }
}
