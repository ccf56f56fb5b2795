//! Event identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identifier for a class of occurrence the machine can react to.
///
/// Two events are equal iff their ids are equal. Events are immutable and
/// cheap to clone, so the same event can be shared across many machines.
///
/// # Example
///
/// ```rust
/// use modegraph::core::Event;
///
/// let start = Event::new("start");
/// assert_eq!(start, Event::from("start"));
/// assert_eq!(start.id(), "start");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Arc<str>);

impl Event {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Event {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Event {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&Event> for Event {
    fn from(event: &Event) -> Self {
        event.clone()
    }
}

impl Borrow<str> for Event {
    fn borrow(&self) -> &str {
        &self.0
    }
}
