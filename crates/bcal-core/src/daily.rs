//! Per-day aggregation of coalesced events.
//!
//! An event belongs to the calendar day it starts on and, if it ends on a
//! different day, to that day as well. Sleep minutes are split at midnight so
//! each day only counts the part of a session that falls inside it.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::calendar::CalendarEntry;
use crate::event::{ActivityEvent, format_hours_minutes};
use crate::kind::EventKind;

/// Aggregate statistics for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub poop_count: usize,
    /// Sleep sessions attributed to the day, closed or not.
    pub sleep_sessions: usize,
    pub total_sleep_minutes: i64,
    /// Coalesced feed entries attributed to the day.
    pub feed_entries: usize,
    pub total_feed_amount: u64,
}

impl DailySummary {
    /// Synthetic all-day entries, one per category with a non-zero total.
    pub fn all_day_entries(&self) -> Vec<CalendarEntry> {
        let mut entries = Vec::new();

        if self.poop_count > 0 {
            let kind = EventKind::Poop;
            entries.push(CalendarEntry::all_day(
                self.date,
                kind.emoji().repeat(self.poop_count),
                kind.color(),
            ));
        }

        if self.total_sleep_minutes > 0 {
            let kind = EventKind::Asleep;
            entries.push(CalendarEntry::all_day(
                self.date,
                format!(
                    "{}asleep for {}",
                    kind.emoji().repeat(self.sleep_sessions),
                    format_hours_minutes(self.total_sleep_minutes)
                ),
                kind.color(),
            ));
        }

        if self.total_feed_amount > 0 {
            let kind = EventKind::Eat;
            entries.push(CalendarEntry::all_day(
                self.date,
                format!(
                    "{}took {}",
                    kind.emoji().repeat(self.feed_entries),
                    self.total_feed_amount
                ),
                kind.color(),
            ));
        }

        entries
    }
}

/// Groups events by every calendar day they touch at their boundaries.
pub fn group_by_date(events: &[ActivityEvent]) -> BTreeMap<NaiveDate, Vec<&ActivityEvent>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&ActivityEvent>> = BTreeMap::new();

    for event in events {
        let start_date = event.start.date();
        groups.entry(start_date).or_default().push(event);

        if let Some(end) = event.end {
            let end_date = end.date();
            if end_date != start_date {
                groups.entry(end_date).or_default().push(event);
            }
        }
    }

    groups
}

/// Minutes of sleep falling on `date` across the given sessions.
///
/// Non-sleep events and sessions without an end contribute nothing.
pub fn total_sleep_minutes<'a, I>(events: I, date: NaiveDate) -> i64
where
    I: IntoIterator<Item = &'a ActivityEvent>,
{
    events
        .into_iter()
        .filter(|event| event.kind == EventKind::Asleep)
        .filter_map(|event| event.end.map(|end| (event.start, end)))
        .map(|(start, end)| {
            let (from, to) = if start.date() != date {
                // Carried over from the night before.
                (midnight(date), end)
            } else if end.date() != date {
                // Runs into the next day.
                (start, midnight(date + Duration::days(1)))
            } else {
                (start, end)
            };
            (to - from).num_minutes()
        })
        .sum()
}

/// Computes one summary per day touched by the events, in date order.
pub fn summarize(events: &[ActivityEvent]) -> Vec<DailySummary> {
    group_by_date(events)
        .into_iter()
        .map(|(date, group)| {
            let of_kind = |kind: EventKind| group.iter().copied().filter(move |e| e.kind == kind);

            DailySummary {
                date,
                poop_count: of_kind(EventKind::Poop).count(),
                sleep_sessions: of_kind(EventKind::Asleep).count(),
                total_sleep_minutes: total_sleep_minutes(of_kind(EventKind::Asleep), date),
                feed_entries: of_kind(EventKind::Eat).count(),
                total_feed_amount: of_kind(EventKind::Eat)
                    .filter_map(|e| e.amount)
                    .fold(0, u64::saturating_add),
            }
        })
        .collect()
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
