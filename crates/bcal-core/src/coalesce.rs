//! Coalescing of adjacent same-kind events.
//!
//! # Algorithm Summary
//!
//! Events are folded in input order (which must be non-decreasing by start).
//! The fold keeps, per kind, the most recently produced event (its
//! *representative*):
//!
//! 1. Sleeps are always emitted; a new sleep starts a new session.
//! 2. A wake closes the open sleep representative if it falls within the
//!    sleep window of that sleep's start, and is then not emitted itself.
//! 3. A feed merges into the feed representative while it falls within the
//!    feed window of the representative's *first* start. Windows never slide.
//! 4. Everything else is emitted as-is.
//!
//! The just-built wake is recorded as the most recent wake even when it is
//! swallowed by a sleep, so the next-rest predictor sees the real wake time.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::event::{ActivityEvent, RawLogRow};
use crate::kind::{EventKind, MergeRule};

/// Result of a coalescing run.
#[derive(Debug, Clone, Default)]
pub struct Coalesced {
    /// Output sequence, in order of first occurrence.
    pub events: Vec<ActivityEvent>,
    /// Most recently produced event of each kind.
    pub recent: RecentEvents,
}

/// The most recently seen event per kind, frozen at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentEvents(HashMap<EventKind, ActivityEvent>);

impl RecentEvents {
    pub fn get(&self, kind: EventKind) -> Option<&ActivityEvent> {
        self.0.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the representative of a kind lives.
#[derive(Debug, Clone)]
enum Slot {
    /// Index into the output sequence.
    Emitted(usize),
    /// Built but folded into another event, never emitted.
    Detached(ActivityEvent),
}

/// Stateful fold over a single run's events.
#[derive(Debug)]
pub struct Coalescer<'a> {
    config: &'a PipelineConfig,
    events: Vec<ActivityEvent>,
    recent: HashMap<EventKind, Slot>,
    last_start: Option<NaiveDateTime>,
}

impl<'a> Coalescer<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
            recent: HashMap::new(),
            last_start: None,
        }
    }

    /// Builds the event for a row and folds it in.
    pub fn push_row(&mut self, row: &RawLogRow) -> Result<(), PipelineError> {
        let event = ActivityEvent::from_row(row)?;
        self.push(event)
    }

    /// Folds one event in.
    ///
    /// On error the fold state is left untouched, so the caller may skip the
    /// offending event and continue.
    pub fn push(&mut self, event: ActivityEvent) -> Result<(), PipelineError> {
        if let Some(previous) = self.last_start {
            if self.config.reject_out_of_order && event.start < previous {
                return Err(PipelineError::OrderingViolation {
                    previous,
                    current: event.start,
                });
            }
        }
        self.last_start = Some(event.start);

        let kind = event.kind;
        match kind.behavior().merge {
            MergeRule::Standalone => self.emit(event),
            MergeRule::ClosesOpen(target) => {
                let window = self.config.sleep_window();
                let closed = match self.recent_mut(target) {
                    Some(open) if open.end.is_none() && within(open.start, event.start, window) => {
                        open.close_at(event.start);
                        debug!(%kind, start = %open.start, end = %event.start, "closed open {target}");
                        true
                    }
                    _ => false,
                };
                if closed {
                    self.recent.insert(kind, Slot::Detached(event));
                } else {
                    self.emit(event);
                }
            }
            MergeRule::Accumulates => {
                let window = self.config.eat_window();
                let merged = match self.recent_mut(kind) {
                    Some(representative) if within(representative.start, event.start, window) => {
                        representative.absorb(&event);
                        debug!(
                            %kind,
                            anchor = %representative.start,
                            occurrences = representative.occurrence_count,
                            "merged into representative"
                        );
                        true
                    }
                    _ => false,
                };
                if !merged {
                    self.emit(event);
                }
            }
        }

        Ok(())
    }

    /// Most recent event of a kind, as currently folded.
    pub fn recent(&self, kind: EventKind) -> Option<&ActivityEvent> {
        match self.recent.get(&kind)? {
            Slot::Emitted(index) => self.events.get(*index),
            Slot::Detached(event) => Some(event),
        }
    }

    /// Ends the run, resolving every representative to its final state.
    pub fn finish(self) -> Coalesced {
        let recent = self
            .recent
            .iter()
            .filter_map(|(kind, slot)| {
                let event = match slot {
                    Slot::Emitted(index) => self.events.get(*index)?.clone(),
                    Slot::Detached(event) => event.clone(),
                };
                Some((*kind, event))
            })
            .collect();

        Coalesced {
            events: self.events,
            recent: RecentEvents(recent),
        }
    }

    fn emit(&mut self, event: ActivityEvent) {
        let kind = event.kind;
        self.events.push(event);
        self.recent.insert(kind, Slot::Emitted(self.events.len() - 1));
    }

    fn recent_mut(&mut self, kind: EventKind) -> Option<&mut ActivityEvent> {
        match self.recent.get_mut(&kind)? {
            Slot::Emitted(index) => self.events.get_mut(*index),
            Slot::Detached(event) => Some(event),
        }
    }
}

/// Whether `at` falls in `[anchor, anchor + window)`.
fn within(anchor: NaiveDateTime, at: NaiveDateTime, window: Duration) -> bool {
    let delta = at - anchor;
    delta >= Duration::zero() && delta < window
}

/// Coalesces a whole sequence of already-built events.
pub fn coalesce<I>(events: I, config: &PipelineConfig) -> Result<Coalesced, PipelineError>
where
    I: IntoIterator<Item = ActivityEvent>,
{
    let mut coalescer = Coalescer::new(config);
    for event in events {
        coalescer.push(event)?;
    }
    Ok(coalescer.finish())
}
