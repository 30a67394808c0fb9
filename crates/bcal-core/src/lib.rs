//! Core domain logic for the activity calendar.
//!
//! This crate turns a chronologically ordered log of free-text activity rows
//! into calendar entries:
//! - Parsing: loose timestamps and ordered text classification
//! - Coalescing: folding adjacent sleeps/wakes and feeds into single entries
//! - Aggregation: per-day poop, sleep and feed totals
//! - Prediction: when the subject should next rest
//!
//! The crate performs no I/O; the caller supplies rows and the current time.

pub mod calendar;
pub mod classify;
pub mod coalesce;
mod config;
pub mod daily;
mod error;
pub mod event;
pub mod kind;
pub mod pipeline;
pub mod predict;
pub mod timestamp;

pub use calendar::{CalendarEntry, EntryStart};
pub use classify::classify;
pub use coalesce::{Coalesced, Coalescer, RecentEvents, coalesce};
pub use config::{PipelineConfig, RowErrorPolicy, ValidationError};
pub use daily::{DailySummary, group_by_date, summarize, total_sleep_minutes};
pub use error::{PipelineError, RowError};
pub use event::{ActivityEvent, RawLogRow, format_hours_minutes};
pub use kind::{Color, EventKind, KindBehavior, MergeRule};
pub use pipeline::{SkippedRow, Timeline, run};
pub use predict::{PredictedRestEvent, RestKind, predict_next_rest};
pub use timestamp::parse_timestamp;
