//! Dispatch history.
//!
//! Keeps a bounded, ordered record of the transitions a machine has taken so
//! hosts and renderers can inspect what happened recently.

use super::event::Event;
use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions retained by a [`TransitionHistory`].
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Record of one transition taken by the machine, self-loops included.
///
/// # Example
///
/// ```rust
/// use modegraph::core::{Event, FiredTransition, StateId};
/// use chrono::Utc;
///
/// let fired = FiredTransition {
///     event: Event::new("engage"),
///     from: StateId::new("standby"),
///     to: StateId::new("active"),
///     timestamp: Utc::now(),
/// };
/// assert!(!fired.is_self_loop());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredTransition {
    /// The event that triggered the transition
    pub event: Event,
    /// The state that was exited
    pub from: StateId,
    /// The state that was entered
    pub to: StateId,
    /// When the pointer moved
    pub timestamp: DateTime<Utc>,
}

impl FiredTransition {
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered, bounded history of fired transitions.
///
/// Once `capacity` records are held, recording a new one drops the oldest.
/// A capacity of zero disables recording. A deserialized history holding more
/// records than its capacity is trimmed to the newest ones on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "StoredHistory")]
pub struct TransitionHistory {
    capacity: usize,
    transitions: VecDeque<FiredTransition>,
    dropped: usize,
}

#[derive(Deserialize)]
struct StoredHistory {
    capacity: usize,
    transitions: VecDeque<FiredTransition>,
    dropped: usize,
}

impl From<StoredHistory> for TransitionHistory {
    fn from(stored: StoredHistory) -> Self {
        let mut history = Self {
            capacity: stored.capacity,
            transitions: stored.transitions,
            dropped: stored.dropped,
        };
        history.retain_newest(history.capacity);
        history
    }
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            dropped: 0,
        }
    }

    pub fn record(&mut self, transition: FiredTransition) {
        if self.capacity == 0 {
            self.retain_newest(0);
            self.dropped += 1;
            return;
        }
        self.retain_newest(self.capacity - 1);
        self.transitions.push_back(transition);
    }

    // evicts oldest first, counting each eviction as dropped
    fn retain_newest(&mut self, keep: usize) {
        while self.transitions.len() > keep {
            self.transitions.pop_front();
            self.dropped += 1;
        }
    }

    /// Most recent transition, if any was retained.
    pub fn last(&self) -> Option<&FiredTransition> {
        self.transitions.back()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl DoubleEndedIterator<Item = &FiredTransition> + '_ {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records evicted or never stored because of the capacity.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// States traversed by the retained transitions: the source of the
    /// oldest, then the destination of each.
    pub fn path(&self) -> Vec<&StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Time between the oldest and newest retained transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Forget every retained record and reset the dropped count.
    pub fn clear(&mut self) {
        self.transitions.clear();
        self.dropped = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fired(event: &str, from: &str, to: &str) -> FiredTransition {
        FiredTransition {
            event: Event::new(event),
            from: StateId::new(from),
            to: StateId::new(to),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = TransitionHistory::new();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn path_follows_recorded_transitions() {
        let mut history = TransitionHistory::new();
        history.record(fired("go", "a", "b"));
        history.record(fired("go", "b", "c"));

        let path = history.path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].as_str(), "a");
        assert_eq!(path[1].as_str(), "b");
        assert_eq!(path[2].as_str(), "c");
        assert_eq!(history.last().map(|t| t.to.as_str()), Some("c"));
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut history = TransitionHistory::with_capacity(2);
        history.record(fired("e", "a", "b"));
        history.record(fired("e", "b", "c"));
        history.record(fired("e", "c", "d"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.dropped(), 1);
        let sources: Vec<_> = history.transitions().map(|t| t.from.as_str()).collect();
        assert_eq!(sources, vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = TransitionHistory::with_capacity(0);
        history.record(fired("e", "a", "b"));
        assert!(history.is_empty());
        assert_eq!(history.dropped(), 1);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let mut history = TransitionHistory::new();
        let start = Utc::now();
        let mut first = fired("e", "a", "b");
        first.timestamp = start;
        let mut second = fired("e", "b", "a");
        second.timestamp = start + chrono::Duration::milliseconds(10);
        history.record(first);
        history.record(second);

        assert_eq!(history.duration(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn self_loops_are_recognised() {
        assert!(fired("hold", "a", "a").is_self_loop());
        assert!(!fired("go", "a", "b").is_self_loop());
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = TransitionHistory::with_capacity(4);
        history.record(fired("go", "a", "b"));

        let json = serde_json::to_string(&history).unwrap();
        let back: TransitionHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.capacity(), 4);
        assert_eq!(back.last(), history.last());
    }

    #[test]
    fn overfull_history_is_trimmed_on_load() {
        let mut history = TransitionHistory::with_capacity(4);
        history.record(fired("e", "a", "b"));
        history.record(fired("e", "b", "c"));
        let mut json = serde_json::to_value(&history).unwrap();
        json["capacity"] = serde_json::json!(1);

        let mut back: TransitionHistory = serde_json::from_value(json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.dropped(), 1);
        assert_eq!(back.last().map(|t| t.to.as_str()), Some("c"));

        for to in ["d", "e", "f"] {
            back.record(fired("e", "c", to));
            assert!(back.len() <= back.capacity());
        }
        assert_eq!(back.len(), 1);
        assert_eq!(back.dropped(), 4);
        assert_eq!(back.last().map(|t| t.to.as_str()), Some("f"));
    }

    #[test]
    fn zero_capacity_history_with_records_empties_on_load() {
        let mut history = TransitionHistory::with_capacity(2);
        history.record(fired("e", "a", "b"));
        let mut json = serde_json::to_value(&history).unwrap();
        json["capacity"] = serde_json::json!(0);

        let mut back: TransitionHistory = serde_json::from_value(json).unwrap();
        assert!(back.is_empty());
        back.record(fired("e", "b", "c"));
        assert!(back.is_empty());
        assert_eq!(back.dropped(), 2);
    }

    #[test]
    fn clear_resets_records_and_dropped_count() {
        let mut history = TransitionHistory::with_capacity(1);
        history.record(fired("e", "a", "b"));
        history.record(fired("e", "b", "c"));
        assert_eq!(history.dropped(), 1);

        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.dropped(), 0);
        assert!(history.path().is_empty());
    }
}
