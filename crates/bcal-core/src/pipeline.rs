//! End-to-end run over a raw log snapshot.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::calendar::CalendarEntry;
use crate::coalesce::{Coalescer, RecentEvents};
use crate::config::{PipelineConfig, RowErrorPolicy};
use crate::daily::{DailySummary, summarize};
use crate::error::{PipelineError, RowError};
use crate::event::{ActivityEvent, RawLogRow};
use crate::predict::{PredictedRestEvent, predict_next_rest};

/// A row dropped under [`RowErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based position in the input.
    pub row: usize,
    pub timestamp: String,
    pub activity: String,
    pub reason: String,
}

/// Everything derived from one snapshot of the log.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub events: Vec<ActivityEvent>,
    pub recent: RecentEvents,
    pub summaries: Vec<DailySummary>,
    pub prediction: Option<PredictedRestEvent>,
    pub skipped: Vec<SkippedRow>,
}

impl Timeline {
    /// Merged renderable list: coalesced events, then the predicted rest
    /// (if any), then the all-day summaries.
    pub fn calendar_entries(&self) -> Vec<CalendarEntry> {
        self.events
            .iter()
            .map(CalendarEntry::from)
            .chain(self.prediction.iter().map(PredictedRestEvent::calendar_entry))
            .chain(self.summaries.iter().flat_map(DailySummary::all_day_entries))
            .collect()
    }
}

/// Runs the full pipeline over rows in chronological order.
///
/// `now` only affects the predicted rest. Bad rows abort the run or are
/// skipped according to `config.on_row_error`; feed rows without an amount
/// always abort.
pub fn run(
    rows: &[RawLogRow],
    config: &PipelineConfig,
    now: NaiveDateTime,
) -> Result<Timeline, RowError> {
    let mut coalescer = Coalescer::new(config);
    let mut skipped = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let position = index + 1;
        match coalescer.push_row(row) {
            Ok(()) => {}
            Err(err) if skippable(&err, config.on_row_error) => {
                warn!(row = position, timestamp = %row.timestamp, error = %err, "skipping row");
                skipped.push(SkippedRow {
                    row: position,
                    timestamp: row.timestamp.clone(),
                    activity: row.activity.clone(),
                    reason: err.to_string(),
                });
            }
            Err(source) => {
                return Err(RowError {
                    row: position,
                    source,
                });
            }
        }
    }

    let coalesced = coalescer.finish();
    let summaries = summarize(&coalesced.events);
    let prediction = predict_next_rest(&coalesced.recent, now, config);

    info!(
        rows = rows.len(),
        events = coalesced.events.len(),
        days = summaries.len(),
        skipped = skipped.len(),
        predicted = prediction.is_some(),
        "processed activity log"
    );

    Ok(Timeline {
        events: coalesced.events,
        recent: coalesced.recent,
        summaries,
        prediction,
        skipped,
    })
}

fn skippable(err: &PipelineError, policy: RowErrorPolicy) -> bool {
    policy == RowErrorPolicy::Skip && !err.is_defect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EntryStart;
    use chrono::NaiveDate;

    fn rows(rows: &[(&str, &str)]) -> Vec<RawLogRow> {
        rows.iter().map(|(ts, a)| RawLogRow::new(*ts, *a)).collect()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 6, 5)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid test timestamp")
    }

    fn sample() -> Vec<RawLogRow> {
        rows(&[
            ("June 4, 2019 at 10:19PM", "asleep"),
            ("June 5, 2019 at 11:19AM", "awake"),
            ("June 5, 2019 at 11:25AM", "took 90"),
            ("June 5, 2019 at 11:50AM", "took 30"),
            ("June 5, 2019 at 11:55AM", "pooped"),
        ])
    }

    #[test]
    fn produces_events_summaries_and_prediction() {
        let timeline = run(&sample(), &PipelineConfig::default(), now()).unwrap();

        assert_eq!(timeline.events.len(), 3);
        assert_eq!(timeline.summaries.len(), 2);
        let prediction = timeline.prediction.as_ref().expect("subject is awake");
        assert_eq!(prediction.title(), "💤Time for a nap! (awake for 2:30)");
        assert!(timeline.skipped.is_empty());
    }

    #[test]
    fn calendar_entries_are_merged_in_order() {
        let timeline = run(&sample(), &PipelineConfig::default(), now()).unwrap();
        let titles: Vec<_> = timeline
            .calendar_entries()
            .into_iter()
            .map(|entry| entry.title)
            .collect();

        assert_eq!(
            titles,
            vec![
                "😴asleep for 13:00",
                "🍼🍼took 120",
                "💩",
                "💤Time for a nap! (awake for 2:30)",
                "😴asleep for 1:41",
                "💩",
                "😴asleep for 11:19",
                "🍼took 120",
            ]
        );
    }

    #[test]
    fn all_day_entries_come_last() {
        let timeline = run(&sample(), &PipelineConfig::default(), now()).unwrap();
        let entries = timeline.calendar_entries();

        let first_all_day = entries.iter().position(|e| e.all_day).unwrap();
        assert!(entries[first_all_day..].iter().all(|e| e.all_day));
        assert!(matches!(entries[first_all_day].start, EntryStart::AllDay(_)));
    }

    #[test]
    fn abort_policy_reports_row_number() {
        let mut input = sample();
        input.insert(1, RawLogRow::new("not a time", "awake"));

        let err = run(&input, &PipelineConfig::default(), now()).unwrap_err();
        assert_eq!(err.row, 2);
        assert!(matches!(err.source, PipelineError::Parse { .. }));
    }

    #[test]
    fn skip_policy_drops_bad_rows() {
        let mut input = sample();
        input.insert(1, RawLogRow::new("not a time", "awake"));
        input.push(RawLogRow::new("June 4, 2019 at 09:00AM", "late entry"));
        let config = PipelineConfig {
            on_row_error: RowErrorPolicy::Skip,
            ..PipelineConfig::default()
        };

        let timeline = run(&input, &config, now()).unwrap();

        assert_eq!(timeline.events.len(), 3);
        let skipped: Vec<_> = timeline.skipped.iter().map(|s| s.row).collect();
        assert_eq!(skipped, vec![2, 7]);
        assert!(timeline.skipped[1].reason.contains("precedes previous row"));
    }

    #[test]
    fn empty_log_yields_empty_timeline() {
        let timeline = run(&[], &PipelineConfig::default(), now()).unwrap();

        assert!(timeline.events.is_empty());
        assert!(timeline.recent.is_empty());
        assert!(timeline.prediction.is_none());
        assert!(timeline.calendar_entries().is_empty());
    }

    #[test]
    fn unvalidated_extreme_config_does_not_panic() {
        let config = PipelineConfig {
            awake_duration_hours: f64::INFINITY,
            eat_coalesce_window_minutes: i64::MAX,
            sleep_coalesce_window_hours: i64::MAX,
            ..PipelineConfig::default()
        };

        let timeline = run(&sample(), &config, now()).unwrap();

        assert_eq!(timeline.events.len(), 3);
        let prediction = timeline.prediction.expect("subject is awake");
        assert_eq!(prediction.start, prediction.last_awake + chrono::Duration::days(7));
    }

    #[test]
    fn large_feeds_on_one_day_saturate() {
        let input = rows(&[
            ("June 5, 2019 at 08:00AM", "took 18446744073709551615"),
            ("June 5, 2019 at 12:00PM", "took 18446744073709551615"),
        ]);

        let timeline = run(&input, &PipelineConfig::default(), now()).unwrap();

        assert_eq!(timeline.events.len(), 2);
        assert_eq!(timeline.summaries[0].total_feed_amount, u64::MAX);
    }

    #[test]
    fn oversized_amount_is_skippable_bad_data() {
        let input = rows(&[
            ("June 5, 2019 at 08:00AM", "took 99999999999999999999"),
            ("June 5, 2019 at 09:00AM", "took 90"),
        ]);

        let err = run(&input, &PipelineConfig::default(), now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "row 1: feed amount too large: \"took 99999999999999999999\""
        );

        let config = PipelineConfig {
            on_row_error: RowErrorPolicy::Skip,
            ..PipelineConfig::default()
        };
        let timeline = run(&input, &config, now()).unwrap();
        assert_eq!(timeline.events.len(), 1);
        assert_eq!(timeline.skipped[0].row, 1);
    }

    #[test]
    fn rerun_is_deterministic() {
        let config = PipelineConfig::default();
        let first = run(&sample(), &config, now()).unwrap().calendar_entries();
        let second = run(&sample(), &config, now()).unwrap().calendar_entries();
        assert_eq!(first, second);
    }
}
