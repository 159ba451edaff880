//! Shared CLI presentation utilities.
//!
//! Format-only: no domain transforms happen here.

pub mod progress;
pub mod tables;

pub use progress::TransferProgress;
pub use tables::{format_date, format_optional, print_separator, truncate_string};
