//! Display-ready calendar entries handed to the renderer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::event::ActivityEvent;
use crate::kind::Color;

/// When an entry starts: a point in time or a whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryStart {
    At(NaiveDateTime),
    AllDay(NaiveDate),
}

/// One renderable calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    pub start: EntryStart,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    pub all_day: bool,
}

impl CalendarEntry {
    pub fn all_day(date: NaiveDate, title: String, color: Color) -> Self {
        Self {
            start: EntryStart::AllDay(date),
            end: None,
            title,
            color: color.as_css(),
            all_day: true,
        }
    }

    pub fn timed(start: NaiveDateTime, end: Option<NaiveDateTime>, title: String, color: Color) -> Self {
        Self {
            start: EntryStart::At(start),
            end,
            title,
            color: color.as_css(),
            all_day: false,
        }
    }

    /// Whether the entry is shown on `date`.
    pub fn touches(&self, date: NaiveDate) -> bool {
        match self.start {
            EntryStart::AllDay(day) => day == date,
            EntryStart::At(start) => {
                let last = self.end.map_or(start.date(), |end| end.date());
                start.date() <= date && date <= last
            }
        }
    }
}

impl From<&ActivityEvent> for CalendarEntry {
    fn from(event: &ActivityEvent) -> Self {
        Self::timed(event.start, event.end, event.title(), event.color())
    }
}
