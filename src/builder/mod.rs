//! Builder API for ergonomic machine construction.
//!
//! [`FsmBuilder`] collects states, transitions and collaborators fluently and
//! hands them to [`crate::machine::Fsm::with_options`]. The free functions
//! here build common transition shapes.

pub mod machine;

pub use machine::FsmBuilder;

use crate::core::{Event, State, StateId};
use crate::machine::TransitionSpec;

/// Transitions moving each state to the next one on `event`.
///
/// # Example
///
/// ```
/// use modegraph::builder::chain;
/// use modegraph::core::{Event, State, StateId};
///
/// let states = [State::new("low"), State::new("mid"), State::new("high")];
/// let spec = chain("up", &states);
///
/// let (event, pairs) = spec.groups().next().unwrap();
/// assert_eq!(event, &Event::new("up"));
/// assert_eq!(pairs[1], (StateId::new("mid"), StateId::new("high")));
/// ```
pub fn chain(event: impl Into<Event>, states: &[State]) -> TransitionSpec {
    TransitionSpec::new().on(
        event,
        states.windows(2).map(|pair| (&pair[0], &pair[1])),
    )
}

/// Self-loops on every state for `event`.
pub fn self_loops(event: impl Into<Event>, states: &[State]) -> TransitionSpec {
    TransitionSpec::new().on(event, states.iter().map(|s| (s, s)))
}

/// A single transition as a spec, for composing with [`FsmBuilder::spec`].
pub fn single(
    event: impl Into<Event>,
    source: impl Into<StateId>,
    dest: impl Into<StateId>,
) -> TransitionSpec {
    let pair: (StateId, StateId) = (source.into(), dest.into());
    TransitionSpec::new().on(event, [pair])
}
