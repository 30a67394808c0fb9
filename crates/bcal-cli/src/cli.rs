//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::events::EventsArgs;
use crate::commands::next::NextArgs;
use crate::commands::summary::SummaryArgs;

/// Activity log calendar.
///
/// Reads a timestamped free-text activity log (sleeps, wakes, feeds, diapers),
/// merges related entries and reports daily totals and the next rest.
#[derive(Debug, Parser)]
#[command(name = "bcal", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log source: an http(s) URL, a file path, or `-` for stdin.
    #[arg(short, long, global = true)]
    pub source: Option<String>,

    /// Treat this as the current time (e.g. "June 5, 2019 at 12:00PM").
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List calendar entries: merged events, next rest and daily totals.
    Events(EventsArgs),

    /// Show per-day totals.
    Summary(SummaryArgs),

    /// Show when the next rest is due.
    Next(NextArgs),
}
