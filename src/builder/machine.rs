//! Builder for constructing machines.

use crate::core::{Event, State, StateId};
use crate::logging::FsmLogger;
use crate::machine::{BuildError, Fsm, FsmOptions, TransitionSpec};
use crate::viz::Visualizer;
use std::sync::Arc;

/// Builder for constructing machines with a fluent API.
///
/// Validation happens in [`FsmBuilder::build`], with the same rules and
/// error reporting as [`Fsm::new`].
#[derive(Debug, Default)]
pub struct FsmBuilder {
    states: Vec<State>,
    spec: TransitionSpec,
    initial: Option<StateId>,
    options: FsmOptions,
}

impl FsmBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a state.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Declare several states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Bind a single `source -> dest` transition on `event`.
    pub fn transition(
        mut self,
        event: impl Into<Event>,
        source: impl Into<StateId>,
        dest: impl Into<StateId>,
    ) -> Self {
        let pair: (StateId, StateId) = (source.into(), dest.into());
        self.spec.push(event, [pair]);
        self
    }

    /// Bind a group of transitions on `event`.
    pub fn on<E, S, D, I>(mut self, event: E, pairs: I) -> Self
    where
        E: Into<Event>,
        S: Into<StateId>,
        D: Into<StateId>,
        I: IntoIterator<Item = (S, D)>,
    {
        self.spec.push(event, pairs);
        self
    }

    /// Append prepared transition groups.
    pub fn spec(mut self, spec: TransitionSpec) -> Self {
        for (event, pairs) in spec.groups() {
            self.spec.push(event, pairs.iter().cloned());
        }
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<StateId>) -> Self {
        self.initial = Some(state.into());
        self
    }

    pub fn logger(mut self, logger: impl FsmLogger + 'static) -> Self {
        self.options.logger = Arc::new(logger);
        self
    }

    pub fn shared_logger(mut self, logger: Arc<dyn FsmLogger>) -> Self {
        self.options.logger = logger;
        self
    }

    pub fn visualizer(mut self, visualizer: impl Visualizer + 'static) -> Self {
        self.options.visualizer = Some(Arc::new(visualizer));
        self
    }

    /// Number of transitions kept in the machine's history.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.options.history_capacity = capacity;
        self
    }

    /// Build the machine, running the initial state's entry action.
    pub fn build(self) -> Result<Fsm, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        Fsm::with_options(self.states, self.spec, initial, self.options)
    }
}
