//! Next command: when the next rest is due.

use std::io::Write;

use anyhow::Result;
use bcal_core::{EventKind, Timeline};
use clap::Args;

#[derive(Debug, Args)]
pub struct NextArgs {
    /// Output JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &NextArgs, timeline: &Timeline) -> Result<()> {
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&timeline.prediction)?)?;
        return Ok(());
    }

    if let Some(prediction) = &timeline.prediction {
        writeln!(
            writer,
            "{}  {}",
            prediction.start.format("%Y-%m-%d %H:%M"),
            prediction.title()
        )?;
    } else if let Some(asleep) = timeline.recent.get(EventKind::Asleep) {
        writeln!(
            writer,
            "Asleep since {}; no rest due.",
            asleep.start.format("%Y-%m-%d %H:%M")
        )?;
    } else {
        writeln!(writer, "No sleep history yet; cannot predict the next rest.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use bcal_core::{PipelineConfig, RawLogRow};
    use insta::assert_snapshot;

    use crate::commands::util::{resolve_now, sample_timeline};

    fn render(timeline: &Timeline, json: bool) -> String {
        let mut output = Vec::new();
        run(&mut output, &NextArgs { json }, timeline).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn timeline_of(rows: &[(&str, &str)]) -> Timeline {
        let rows: Vec<_> = rows.iter().map(|(ts, a)| RawLogRow::new(*ts, *a)).collect();
        let now = resolve_now(Some("June 5, 2019 at 03:00PM")).unwrap();
        bcal_core::run(&rows, &PipelineConfig::default(), now).unwrap()
    }

    #[test]
    fn awake_subject_gets_advisory() {
        assert_snapshot!(render(&sample_timeline(), false), @"2019-06-05 13:49  💤Time for a nap! (awake for 2:30)");
    }

    #[test]
    fn asleep_subject_gets_none() {
        let timeline = timeline_of(&[
            ("June 5, 2019 at 09:00AM", "up"),
            ("June 5, 2019 at 01:00PM", "down"),
        ]);
        assert_eq!(render(&timeline, false), "Asleep since 2019-06-05 13:00; no rest due.\n");
    }

    #[test]
    fn wake_without_any_sleep_cannot_predict() {
        let timeline = timeline_of(&[("June 5, 2019 at 09:00AM", "up")]);
        assert_eq!(
            render(&timeline, false),
            "No sleep history yet; cannot predict the next rest.\n"
        );
    }

    #[test]
    fn json_is_null_without_prediction() {
        let timeline = timeline_of(&[("June 5, 2019 at 01:00PM", "down")]);
        assert_eq!(render(&timeline, true), "null\n");
    }

    #[test]
    fn json_reports_rest_kind() {
        let value: serde_json::Value =
            serde_json::from_str(&render(&sample_timeline(), true)).unwrap();
        assert_eq!(value["rest"], "nap");
        assert_eq!(value["start"], "2019-06-05T13:49:00");
        assert_eq!(value["last_awake"], "2019-06-05T11:19:00");
    }
}
