//! States and the actions bound to them.
//!
//! A state is an operating mode identified by a [`StateId`]. It may carry an
//! entry action and an exit action, both fixed when the state is built and
//! invoked later with no call-site parameters.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Error raised by an entry or exit action.
///
/// The machine never inspects or wraps these during dispatch; they reach the
/// caller of `fire_event` exactly as the action returned them.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Identity key of a state, unique within one machine.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(Arc<str>);

impl StateId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({})", self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StateId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&StateId> for StateId {
    fn from(id: &StateId) -> Self {
        id.clone()
    }
}

impl From<&State> for StateId {
    fn from(state: &State) -> Self {
        state.id.clone()
    }
}

impl Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A side effect run when a state is entered or exited.
///
/// Any `Fn() -> Result<(), ActionError>` closure is an action. Arguments are
/// bound at construction time by capturing them, or with [`bind`].
///
/// # Example
///
/// ```rust
/// use modegraph::core::{Action, ActionError};
///
/// let ping = || -> Result<(), ActionError> { Ok(()) };
/// assert!(ping.execute().is_ok());
/// ```
pub trait Action: Send + Sync {
    fn execute(&self) -> Result<(), ActionError>;
}

impl<F> Action for F
where
    F: Fn() -> Result<(), ActionError> + Send + Sync,
{
    fn execute(&self) -> Result<(), ActionError> {
        self()
    }
}

/// An action that owns the arguments it is invoked with.
///
/// Created by [`bind`].
pub struct BoundAction<A, F> {
    args: A,
    f: F,
}

impl<A, F> Action for BoundAction<A, F>
where
    A: Send + Sync,
    F: Fn(&A) -> Result<(), ActionError> + Send + Sync,
{
    fn execute(&self) -> Result<(), ActionError> {
        (self.f)(&self.args)
    }
}

impl<A: fmt::Debug, F> fmt::Debug for BoundAction<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Bind `args` to `f`, producing an action that calls `f(&args)` each time it
/// executes.
///
/// # Example
///
/// ```rust
/// use modegraph::core::{bind, Action};
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
///
/// let counter = Arc::new(AtomicI64::new(0));
/// let add = bind(
///     |(counter, amount): &(Arc<AtomicI64>, i64)| {
///         counter.fetch_add(*amount, Ordering::SeqCst);
///         Ok(())
///     },
///     (counter.clone(), 5),
/// );
///
/// add.execute().unwrap();
/// assert_eq!(counter.load(Ordering::SeqCst), 5);
/// ```
pub fn bind<A, F>(f: F, args: A) -> BoundAction<A, F>
where
    A: Send + Sync,
    F: Fn(&A) -> Result<(), ActionError> + Send + Sync,
{
    BoundAction { args, f }
}

/// An operating mode of the machine.
///
/// Cloning a state shares its actions. Two states are equal iff their ids are
/// equal, so a machine can recognise a state handed back to it by value.
///
/// # Example
///
/// ```rust
/// use modegraph::core::State;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let entered = Arc::new(AtomicUsize::new(0));
/// let seen = entered.clone();
/// let idle = State::new("idle").on_entry(move || {
///     seen.fetch_add(1, Ordering::SeqCst);
/// });
///
/// idle.enter().unwrap();
/// assert_eq!(entered.load(Ordering::SeqCst), 1);
/// assert_eq!(idle.id().as_str(), "idle");
/// ```
#[derive(Clone)]
pub struct State {
    id: StateId,
    entry: Option<Arc<dyn Action>>,
    exit: Option<Arc<dyn Action>>,
}

impl State {
    pub fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            entry: None,
            exit: None,
        }
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }

    /// Run `f` whenever this state is entered.
    pub fn on_entry<F>(self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.try_on_entry(move || -> Result<(), ActionError> {
            f();
            Ok(())
        })
    }

    /// Run `f` whenever this state is exited.
    pub fn on_exit<F>(self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.try_on_exit(move || -> Result<(), ActionError> {
            f();
            Ok(())
        })
    }

    /// Bind a fallible entry action.
    pub fn try_on_entry<A: Action + 'static>(mut self, action: A) -> Self {
        self.entry = Some(Arc::new(action));
        self
    }

    /// Bind a fallible exit action.
    pub fn try_on_exit<A: Action + 'static>(mut self, action: A) -> Self {
        self.exit = Some(Arc::new(action));
        self
    }

    pub fn has_entry_action(&self) -> bool {
        self.entry.is_some()
    }

    pub fn has_exit_action(&self) -> bool {
        self.exit.is_some()
    }

    /// Run the entry action, if one is bound.
    pub fn enter(&self) -> Result<(), ActionError> {
        match &self.entry {
            Some(action) => action.execute(),
            None => Ok(()),
        }
    }

    /// Run the exit action, if one is bound.
    pub fn exit(&self) -> Result<(), ActionError> {
        match &self.exit {
            Some(action) => action.execute(),
            None => Ok(()),
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("on_entry", &self.entry.is_some())
            .field("on_exit", &self.exit.is_some())
            .finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl From<&str> for State {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    #[derive(Debug, thiserror::Error)]
    #[error("valve stuck")]
    struct ValveStuck;

    #[test]
    fn state_without_actions_is_inert() {
        let state = State::new("idle");
        assert!(!state.has_entry_action());
        assert!(!state.has_exit_action());
        assert!(state.enter().is_ok());
        assert!(state.exit().is_ok());
    }

    #[test]
    fn entry_and_exit_run_their_own_actions() {
        let entries = Arc::new(AtomicUsize::new(0));
        let exits = Arc::new(AtomicUsize::new(0));
        let (e, x) = (entries.clone(), exits.clone());
        let state = State::new("run")
            .on_entry(move || {
                e.fetch_add(1, Ordering::SeqCst);
            })
            .on_exit(move || {
                x.fetch_add(1, Ordering::SeqCst);
            });

        state.enter().unwrap();
        state.enter().unwrap();
        state.exit().unwrap();

        assert_eq!(entries.load(Ordering::SeqCst), 2);
        assert_eq!(exits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_action_returns_its_error() {
        let state = State::new("open").try_on_exit(|| -> Result<(), ActionError> {
            Err(ValveStuck.into())
        });

        let err = state.exit().unwrap_err();
        assert!(err.downcast_ref::<ValveStuck>().is_some());
        assert!(state.enter().is_ok());
    }

    #[test]
    fn bound_arguments_are_captured_at_construction() {
        let counter = Arc::new(AtomicI64::new(0));
        let state = State::new("sa").try_on_exit(bind(
            |(counter, amount): &(Arc<AtomicI64>, i64)| {
                counter.fetch_add(*amount, Ordering::SeqCst);
                Ok(())
            },
            (counter.clone(), 5),
        ));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        state.exit().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn clones_share_actions() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let state = State::new("a").on_entry(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let copy = state.clone();

        state.enter().unwrap();
        copy.enter().unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn states_compare_by_id() {
        let plain = State::new("a");
        let with_action = State::new("a").on_entry(|| {});
        assert_eq!(plain, with_action);
        assert_ne!(plain, State::new("b"));
        assert_eq!(StateId::from(&plain), StateId::new("a"));
    }

    #[test]
    fn state_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&StateId::new("cruise")).unwrap();
        assert_eq!(json, "\"cruise\"");
    }
}
