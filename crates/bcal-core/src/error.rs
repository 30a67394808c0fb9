//! Pipeline error types.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while turning a raw log row into an event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The timestamp did not match any recognised date-time grammar.
    #[error("unparseable timestamp: {input:?}")]
    Parse { input: String },

    /// The row was classified as a feed but carries no quantity.
    #[error("feed entry has no amount: {text:?}")]
    AmountParse { text: String },

    /// The feed amount has more digits than fit in a `u64`.
    #[error("feed amount too large: {text:?}")]
    AmountTooLarge { text: String },

    /// A row's timestamp precedes the previously accepted row.
    #[error("row at {current} precedes previous row at {previous}")]
    OrderingViolation {
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
}

impl PipelineError {
    /// Whether this error reflects a contract violation inside the pipeline
    /// rather than bad input data.
    ///
    /// Defects abort a run even when the row error policy is `skip`.
    #[must_use]
    pub const fn is_defect(&self) -> bool {
        matches!(self, Self::AmountParse { .. })
    }
}

/// A [`PipelineError`] tagged with the 1-based position of the offending row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("row {row}: {source}")]
pub struct RowError {
    pub row: usize,
    pub source: PipelineError,
}
