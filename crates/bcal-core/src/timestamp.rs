//! Loose timestamp parsing for logged rows.
//!
//! Log rows carry timestamps like `June 6, 2019 at 05:19AM`. They are
//! normalized (`" at "` dropped, exactly one space before the meridiem)
//! and then matched against a small list of grammars. The result is a naive
//! local time truncated to the minute.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;

use crate::error::PipelineError;

/// Trailing meridiem with any (or no) surrounding whitespace.
static MERIDIEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*([ap]m)\s*$").unwrap());

/// Recognised grammars, tried in order after normalization.
const FORMATS: &[&str] = &[
    "%B %d, %Y %I:%M %p",
    "%B %d %Y %I:%M %p",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a logged timestamp into a naive local instant with minute precision.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, PipelineError> {
    let normalized = normalize(input);

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .ok_or_else(|| PipelineError::Parse {
            input: input.to_string(),
        })
}

fn normalize(input: &str) -> String {
    let spaced = input.trim().replace(" at ", " ");
    MERIDIEM_RE.replace(&spaced, " $1").into_owned()
}
