//! Next-rest prediction from the current awake/asleep state.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::calendar::CalendarEntry;
use crate::coalesce::RecentEvents;
use crate::config::PipelineConfig;
use crate::event::format_hours_minutes;
use crate::kind::{Color, EventKind};

const EMOJI: &str = "💤";

/// Which kind of rest is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestKind {
    Sleep,
    Nap,
}

/// Synthetic advisory for when the subject should next rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictedRestEvent {
    pub start: NaiveDateTime,
    pub last_awake: NaiveDateTime,
    pub rest: RestKind,
    pub advisory_text: String,
}

impl PredictedRestEvent {
    /// Predicts from a known wake time.
    ///
    /// The predicted start is the wake time plus the configured awake
    /// duration, but never earlier than `now`.
    pub fn new(last_awake: NaiveDateTime, now: NaiveDateTime, config: &PipelineConfig) -> Self {
        let start = (last_awake + config.awake_duration()).max(now);
        let awake_for = format_hours_minutes((start - last_awake).num_minutes());

        let hour = start.hour();
        let rest = if hour >= config.bedtime_hour || hour < config.waketime_hour {
            RestKind::Sleep
        } else {
            RestKind::Nap
        };
        let advisory_text = match rest {
            RestKind::Sleep => format!("Time to sleep! (awake for {awake_for})"),
            RestKind::Nap => format!("Time for a nap! (awake for {awake_for})"),
        };

        Self {
            start,
            last_awake,
            rest,
            advisory_text,
        }
    }

    pub fn title(&self) -> String {
        format!("{EMOJI}{}", self.advisory_text)
    }

    pub fn calendar_entry(&self) -> CalendarEntry {
        CalendarEntry::timed(self.start, None, self.title(), Color::Green)
    }
}

/// Predicts the next rest if the subject is currently awake.
///
/// Requires both a known wake and a known sleep, with the wake being later.
pub fn predict_next_rest(
    recent: &RecentEvents,
    now: NaiveDateTime,
    config: &PipelineConfig,
) -> Option<PredictedRestEvent> {
    let awake = recent.get(EventKind::Awake)?;
    let asleep = recent.get(EventKind::Asleep)?;
    (awake.start > asleep.start).then(|| PredictedRestEvent::new(awake.start, now, config))
}
