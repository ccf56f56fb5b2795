//! Logging collaborator.
//!
//! The machine reports what it does as [`LogRecord`]s handed to an injected
//! [`FsmLogger`]. It never writes to a process-wide logger itself, so each
//! machine can be observed (or silenced) independently.

use crate::core::{Event, StateId};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::Level;

/// Which action hook ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    Entry,
    Exit,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// Something the machine did that a host may want to log.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogRecord {
    /// An event had no transition from the current state.
    NoTransition { state: StateId, event: Event },
    /// An event looped back into the current state.
    SelfLoop { state: StateId, event: Event },
    /// An event moved the machine to another state.
    Transition {
        from: StateId,
        to: StateId,
        event: Event,
    },
    /// A binding replaced an earlier one for the same event and source.
    Redefinition {
        event: Event,
        state: StateId,
        previous: StateId,
        replacement: StateId,
    },
    /// A second event was bound to an already labelled edge.
    EdgeRelabeled {
        from: StateId,
        to: StateId,
        previous: Event,
        replacement: Event,
    },
    /// An entry or exit action is about to run.
    ActionInvoked { state: StateId, hook: Hook },
    /// A visualizer failed; dispatch was unaffected.
    RenderFailed { error: String },
}

impl LogRecord {
    pub fn level(&self) -> Level {
        match self {
            Self::NoTransition { .. } | Self::EdgeRelabeled { .. } | Self::ActionInvoked { .. } => {
                Level::DEBUG
            }
            Self::SelfLoop { .. } | Self::Transition { .. } => Level::INFO,
            Self::Redefinition { .. } | Self::RenderFailed { .. } => Level::WARN,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTransition { state, event } => {
                write!(f, "From state [{state}], no transition on event [{event}]")
            }
            Self::SelfLoop { state, event } => {
                write!(f, "Self-loop in state [{state}] on event [{event}]")
            }
            Self::Transition { from, to, event } => {
                write!(f, "State [{from}] -> [{to}] on event [{event}]")
            }
            Self::Redefinition {
                event,
                state,
                previous,
                replacement,
            } => write!(
                f,
                "Redefinition for event [{event}] from state [{state}]: [{previous}] replaced by [{replacement}]"
            ),
            Self::EdgeRelabeled {
                from,
                to,
                previous,
                replacement,
            } => write!(
                f,
                "Edge [{from}] -> [{to}] relabeled from [{previous}] to [{replacement}]"
            ),
            Self::ActionInvoked { state, hook } => write!(f, "{hook} actions: state [{state}]"),
            Self::RenderFailed { error } => write!(f, "Visualization failed: {error}"),
        }
    }
}

/// Sink for [`LogRecord`]s.
pub trait FsmLogger: Send + Sync {
    fn log(&self, record: &LogRecord);
}

impl<L: FsmLogger + ?Sized> FsmLogger for Arc<L> {
    fn log(&self, record: &LogRecord) {
        (**self).log(record)
    }
}

/// Forwards records to `tracing` at the record's level.
///
/// This is the default logger; install a `tracing` subscriber in the host to
/// see its output.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl FsmLogger for TracingLogger {
    fn log(&self, record: &LogRecord) {
        match record {
            LogRecord::NoTransition { state, event } => {
                tracing::debug!(state = %state, event = %event, "{record}")
            }
            LogRecord::SelfLoop { state, event } => {
                tracing::info!(state = %state, event = %event, "{record}")
            }
            LogRecord::Transition { from, to, event } => {
                tracing::info!(from = %from, to = %to, event = %event, "{record}")
            }
            LogRecord::Redefinition { event, state, .. } => {
                tracing::warn!(state = %state, event = %event, "{record}")
            }
            LogRecord::EdgeRelabeled { from, to, .. } => {
                tracing::debug!(from = %from, to = %to, "{record}")
            }
            LogRecord::ActionInvoked { state, hook } => {
                tracing::debug!(state = %state, hook = %hook, "{record}")
            }
            LogRecord::RenderFailed { .. } => tracing::warn!("{record}"),
        }
    }
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl FsmLogger for NullLogger {
    fn log(&self, _record: &LogRecord) {}
}

/// Keeps every record in memory.
///
/// # Example
///
/// ```rust
/// use modegraph::logging::{FsmLogger, LogRecord, MemoryLogger};
/// use modegraph::core::{Event, StateId};
///
/// let logger = MemoryLogger::new();
/// logger.log(&LogRecord::NoTransition {
///     state: StateId::new("idle"),
///     event: Event::new("stop"),
/// });
/// assert_eq!(logger.records().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Records logged at exactly `level`.
    pub fn at_level(&self, level: Level) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level() == level)
            .collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl FsmLogger for MemoryLogger {
    fn log(&self, record: &LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
    }
}
