//! Summary command: per-day totals.

use std::io::Write;

use anyhow::Result;
use bcal_core::{Timeline, format_hours_minutes};
use clap::Args;

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &SummaryArgs, timeline: &Timeline) -> Result<()> {
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&timeline.summaries)?)?;
        return Ok(());
    }

    if timeline.summaries.is_empty() {
        writeln!(writer, "No events recorded.")?;
        return Ok(());
    }

    writeln!(writer, "{:<10}  {:>5}  {:>6}  {:>5}", "DATE", "POOPS", "SLEEP", "FEED")?;
    for day in &timeline.summaries {
        writeln!(
            writer,
            "{}  {:>5}  {:>6}  {:>5}",
            day.date.format("%Y-%m-%d"),
            day.poop_count,
            format_hours_minutes(day.total_sleep_minutes),
            day.total_feed_amount
        )?;
    }
    Ok(())
}
