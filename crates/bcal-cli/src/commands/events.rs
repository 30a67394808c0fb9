//! Events command: the merged calendar list.

use std::io::Write;

use anyhow::Result;
use bcal_core::{CalendarEntry, EntryStart, Timeline};
use clap::Args;

use super::util::parse_date;

/// Width of the "when" column in human output.
const WHEN_WIDTH: usize = 36;

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Only show entries on this day (YYYY-MM-DD or M/D/YY).
    #[arg(long)]
    pub date: Option<String>,

    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &EventsArgs, timeline: &Timeline) -> Result<()> {
    let mut entries = timeline.calendar_entries();
    if let Some(date) = args.date.as_deref() {
        let date = parse_date(date)?;
        entries.retain(|entry| entry.touches(date));
    }

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No events recorded.")?;
    }
    for entry in &entries {
        writeln!(writer, "{:<WHEN_WIDTH$}  {}", format_when(entry), entry.title)?;
    }
    for skipped in &timeline.skipped {
        writeln!(writer, "skipped row {}: {}", skipped.row, skipped.reason)?;
    }
    Ok(())
}

fn format_when(entry: &CalendarEntry) -> String {
    match (entry.start, entry.end) {
        (EntryStart::AllDay(date), _) => format!("{} all day", date.format("%Y-%m-%d")),
        (EntryStart::At(start), None) => start.format("%Y-%m-%d %H:%M").to_string(),
        (EntryStart::At(start), Some(end)) if end.date() == start.date() => {
            format!("{} -> {}", start.format("%Y-%m-%d %H:%M"), end.format("%H:%M"))
        }
        (EntryStart::At(start), Some(end)) => format!(
            "{} -> {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        ),
    }
}
