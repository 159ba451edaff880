//! Terminal progress display for a single transfer.
//!
//! Draws an `indicatif` bar when stdout is a terminal and falls back to
//! occasional plain lines otherwise, so piped output stays readable.

use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};
use nxshelf_core::TransferItem;

const PLAIN_INTERVAL: Duration = Duration::from_secs(2);

/// Progress display that follows [`TransferItem`] snapshots.
pub struct TransferProgress {
    inner: Render,
}

enum Render {
    Fancy(FancyProgress),
    Plain(PlainProgress),
}

impl TransferProgress {
    /// Create a display, auto-detecting terminal capability.
    pub fn new(label: &str) -> Self {
        let inner = if io::stdout().is_terminal() {
            Render::Fancy(FancyProgress::new(label))
        } else {
            Render::Plain(PlainProgress::new(label))
        };
        Self { inner }
    }

    /// Redraw from the latest snapshot.
    pub fn update(&mut self, item: &TransferItem) {
        match &mut self.inner {
            Render::Fancy(inner) => inner.update(item),
            Render::Plain(inner) => inner.update(item),
        }
    }

    /// Replace the label, e.g. while waiting for a checkpoint.
    pub fn set_message(&self, message: &str) {
        match &self.inner {
            Render::Fancy(inner) => inner.bar.set_message(message.to_string()),
            Render::Plain(_) => println!("{message}"),
        }
    }

    /// Remove the display.
    pub fn finish(&mut self) {
        if let Render::Fancy(inner) = &self.inner {
            inner.bar.finish_and_clear();
        }
    }
}

struct FancyProgress {
    bar: ProgressBar,
    saw_length: bool,
}

impl FancyProgress {
    fn new(label: &str) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        bar.set_style(spinner_style());
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            saw_length: false,
        }
    }

    fn update(&mut self, item: &TransferItem) {
        let Some(total) = item.total_bytes else {
            self.bar.set_position(item.bytes_written);
            return;
        };
        if !self.saw_length {
            self.bar.set_style(bar_style());
            self.saw_length = true;
        }
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
        self.bar.set_position(item.bytes_written.min(total));
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} {spinner} {bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg} {bar:28.cyan/blue} {bytes:>9} / {total_bytes:>9} ({percent:>3}%) @ {binary_bytes_per_sec} ETA {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
}

struct PlainProgress {
    label: String,
    last_emit: Option<Instant>,
}

impl PlainProgress {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            last_emit: None,
        }
    }

    fn update(&mut self, item: &TransferItem) {
        let now = Instant::now();
        if self
            .last_emit
            .is_some_and(|last| now.duration_since(last) < PLAIN_INTERVAL)
        {
            return;
        }
        self.last_emit = Some(now);
        println!("{}", plain_line(&self.label, item));
    }
}

fn plain_line(label: &str, item: &TransferItem) -> String {
    match item.total_bytes {
        Some(total) => format!(
            "{label}: {} / {} ({:.1}%)",
            HumanBytes(item.bytes_written),
            HumanBytes(total),
            item.progress_fraction * 100.0
        ),
        None => format!("{label}: {} downloaded", HumanBytes(item.bytes_written)),
    }
}
