//! Caller-supplied transition groups.

use crate::core::{Event, StateId};

/// Ordered mapping from events to the `(source, dest)` pairs they trigger.
///
/// Groups are bound in the order they were added, so when two groups bind the
/// same `(event, source)` the later one wins.
///
/// # Example
///
/// ```rust
/// use modegraph::core::State;
/// use modegraph::machine::TransitionSpec;
///
/// let (idle, busy) = (State::new("idle"), State::new("busy"));
/// let spec = TransitionSpec::new()
///     .on("start", [(&idle, &busy)])
///     .on("stop", [(&busy, &idle)]);
///
/// assert_eq!(spec.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionSpec {
    groups: Vec<(Event, Vec<(StateId, StateId)>)>,
}

impl TransitionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group of pairs triggered by `event`.
    pub fn on<E, S, D, I>(mut self, event: E, pairs: I) -> Self
    where
        E: Into<Event>,
        S: Into<StateId>,
        D: Into<StateId>,
        I: IntoIterator<Item = (S, D)>,
    {
        self.push(event, pairs);
        self
    }

    /// In-place form of [`TransitionSpec::on`].
    pub fn push<E, S, D, I>(&mut self, event: E, pairs: I)
    where
        E: Into<Event>,
        S: Into<StateId>,
        D: Into<StateId>,
        I: IntoIterator<Item = (S, D)>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(source, dest)| (source.into(), dest.into()))
            .collect();
        self.groups.push((event.into(), pairs));
    }

    /// Groups in binding order.
    pub fn groups(&self) -> impl Iterator<Item = (&Event, &[(StateId, StateId)])> + '_ {
        self.groups
            .iter()
            .map(|(event, pairs)| (event, pairs.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<E, S, D> FromIterator<(E, Vec<(S, D)>)> for TransitionSpec
where
    E: Into<Event>,
    S: Into<StateId>,
    D: Into<StateId>,
{
    fn from_iter<T: IntoIterator<Item = (E, Vec<(S, D)>)>>(iter: T) -> Self {
        let mut spec = Self::new();
        for (event, pairs) in iter {
            spec.push(event, pairs);
        }
        spec
    }
}
