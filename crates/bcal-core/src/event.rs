//! Raw log rows and the typed activity events built from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use crate::classify::{AMOUNT_RE, classify};
use crate::error::PipelineError;
use crate::kind::{Color, EventKind};
use crate::timestamp::parse_timestamp;

/// One logged occurrence, as supplied by the external log source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLogRow {
    /// Loosely formatted local time, e.g. `June 6, 2019 at 05:19AM`.
    pub timestamp: String,
    /// Free-text activity. Bare numbers are accepted and kept as text.
    #[serde(deserialize_with = "text_or_number")]
    pub activity: String,
}

impl RawLogRow {
    pub fn new(timestamp: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            activity: activity.into(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

/// A classified, displayable activity, possibly standing for several rows.
///
/// Invariants: `end >= start` when present, `amount` is set exactly for
/// [`EventKind::Eat`], and `occurrence_count` only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub kind: EventKind,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    /// Activity text of the first occurrence.
    pub raw_text: String,
    pub amount: Option<u64>,
    pub occurrence_count: u32,
}

impl ActivityEvent {
    /// Parses, classifies and builds the event for a single row.
    pub fn from_row(row: &RawLogRow) -> Result<Self, PipelineError> {
        let start = parse_timestamp(&row.timestamp)?;
        let kind = classify(&row.activity);
        Self::build(kind, start, &row.activity)
    }

    /// Builds a single-occurrence event of an already classified kind.
    pub fn build(kind: EventKind, start: NaiveDateTime, text: &str) -> Result<Self, PipelineError> {
        let amount = match kind {
            EventKind::Eat => Some(extract_amount(text)?),
            _ => None,
        };

        Ok(Self {
            kind,
            start,
            end: None,
            raw_text: text.to_string(),
            amount,
            occurrence_count: 1,
        })
    }

    pub const fn color(&self) -> Color {
        self.kind.color()
    }

    /// Whole minutes between start and end, if the event is closed.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_minutes())
    }

    /// Closes an open session at `end`.
    pub(crate) fn close_at(&mut self, end: NaiveDateTime) {
        debug_assert!(end >= self.start, "end must not precede start");
        self.end = Some(end);
    }

    /// Folds a later occurrence of the same kind into this representative.
    pub(crate) fn absorb(&mut self, other: &Self) {
        debug_assert_eq!(self.kind, other.kind);
        if let (Some(total), Some(extra)) = (self.amount.as_mut(), other.amount) {
            *total = total.saturating_add(extra);
        }
        self.occurrence_count += 1;
        self.close_at(other.start);
    }

    /// Calendar title: kind emoji plus a kind-specific description.
    pub fn title(&self) -> String {
        let emoji = self.kind.emoji();
        match self.kind {
            EventKind::Poop => emoji.to_string(),
            EventKind::Asleep => match self.duration_minutes() {
                Some(minutes) => format!("{emoji}asleep for {}", format_hours_minutes(minutes)),
                None => format!("{emoji}{}", self.raw_text),
            },
            EventKind::Awake | EventKind::Misc => format!("{emoji}{}", self.raw_text),
            EventKind::Eat => format!(
                "{}took {}",
                emoji.repeat(self.occurrence_count as usize),
                self.amount.unwrap_or_default()
            ),
        }
    }
}

fn extract_amount(text: &str) -> Result<u64, PipelineError> {
    let digits = AMOUNT_RE
        .find(text)
        .ok_or_else(|| PipelineError::AmountParse {
            text: text.to_string(),
        })?;
    // The match is all ASCII digits, so parsing can only fail on overflow.
    digits
        .as_str()
        .parse()
        .map_err(|_| PipelineError::AmountTooLarge {
            text: text.to_string(),
        })
}

/// Formats minutes as `H:MM`. Negative values render as `0:00`.
pub fn format_hours_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
