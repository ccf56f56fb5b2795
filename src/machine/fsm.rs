//! The finite state machine and its dispatch algorithm.

use super::error::BuildError;
use super::spec::TransitionSpec;
use crate::core::{
    ActionError, Event, FiredTransition, State, StateId, TransitionHistory,
    DEFAULT_HISTORY_CAPACITY,
};
use crate::graph::{Edge, NodeIndex, StateGraph, StructuralError, TransitionTable};
use crate::logging::{FsmLogger, Hook, LogRecord, TracingLogger};
use crate::viz::{EdgeView, GraphView, Rendering, Visualizer};
use chrono::Utc;
use std::fmt;
use std::sync::{Arc, RwLock};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Collaborators and limits for a machine.
#[derive(Clone)]
pub struct FsmOptions {
    pub logger: Arc<dyn FsmLogger>,
    pub visualizer: Option<Arc<dyn Visualizer>>,
    pub history_capacity: usize,
}

impl Default for FsmOptions {
    fn default() -> Self {
        Self {
            logger: Arc::new(TracingLogger),
            visualizer: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl fmt::Debug for FsmOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmOptions")
            .field("visualizer", &self.visualizer.as_ref().map(|v| v.media_type()))
            .field("history_capacity", &self.history_capacity)
            .finish_non_exhaustive()
    }
}

/// What a single fire did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No transition was bound; nothing ran.
    Unchanged,
    /// The state was exited and re-entered.
    SelfLoop,
    /// The machine moved here from `from`.
    Transitioned { from: StateId },
}

/// Result of [`Fsm::fire_event`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired {
    /// The current state after the fire.
    pub state: StateId,
    pub outcome: Outcome,
    /// Present only when rendering was requested and succeeded.
    pub rendering: Option<Rendering>,
}

impl Fired {
    pub fn changed(&self) -> bool {
        matches!(self.outcome, Outcome::Transitioned { .. })
    }
}

/// Read-only handle to a machine's current state.
///
/// The handle is updated at the moment the machine's pointer moves, between
/// the exit and entry actions, so an action holding a handle observes the same
/// value the machine does. It is a read-only mirror, not a synchronization
/// mechanism for the machine itself.
#[derive(Clone, Debug)]
pub struct CurrentState(Arc<RwLock<StateId>>);

impl CurrentState {
    fn new(id: StateId) -> Self {
        Self(Arc::new(RwLock::new(id)))
    }

    pub fn get(&self) -> StateId {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, id: StateId) {
        *self
            .0
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = id;
    }
}

/// A finite state machine over a directed graph of states.
///
/// The graph and transition table are fixed at construction. The only field
/// that changes afterwards is the current state, and only
/// [`Fsm::fire_event`] changes it.
///
/// # Example
///
/// ```rust
/// use modegraph::core::{Event, State};
/// use modegraph::machine::{Fsm, Outcome, TransitionSpec};
///
/// let (a, b) = (State::new("a"), State::new("b"));
/// let e0 = Event::new("e0");
/// let spec = TransitionSpec::new().on(&e0, [(&a, &b)]);
///
/// let mut fsm = Fsm::new([a.clone(), b.clone()], spec, &a).unwrap();
/// assert_eq!(fsm.current_state(), &a);
///
/// let fired = fsm.fire_event(&e0).unwrap();
/// assert_eq!(fired.state, *b.id());
/// assert_eq!(fired.outcome, Outcome::Transitioned { from: a.id().clone() });
///
/// // e0 is not handled in b
/// assert_eq!(fsm.fire_event(&e0).unwrap().outcome, Outcome::Unchanged);
/// ```
pub struct Fsm {
    graph: StateGraph,
    table: TransitionTable,
    current: NodeIndex,
    cursor: CurrentState,
    last_transition: Option<FiredTransition>,
    history: TransitionHistory,
    logger: Arc<dyn FsmLogger>,
    visualizer: Option<Arc<dyn Visualizer>>,
}

impl Fsm {
    /// Build a machine logging through `tracing`.
    ///
    /// Every state must have a unique id, every state named by `spec` must be
    /// among `states`, and `initial` must be declared. All violations are
    /// reported together. On success the initial state's entry action has run
    /// exactly once.
    pub fn new<I, S>(states: I, spec: TransitionSpec, initial: S) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = State>,
        S: Into<StateId>,
    {
        Self::with_options(states, spec, initial, FsmOptions::default())
    }

    pub fn with_options<I, S>(
        states: I,
        spec: TransitionSpec,
        initial: S,
        options: FsmOptions,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = State>,
        S: Into<StateId>,
    {
        let initial = initial.into();
        let logger = options.logger;
        let mut graph = StateGraph::new();
        let mut table = TransitionTable::new();
        let mut checks: Vec<Validation<(), NonEmptyVec<StructuralError>>> = Vec::new();

        for state in states {
            checks.push(match graph.add_node(state) {
                Ok(_) => Validation::success(()),
                Err(violation) => Validation::fail(violation),
            });
        }
        if graph.is_empty() {
            checks.push(Validation::fail(StructuralError::EmptyStateSet));
        }

        for (event, pairs) in spec.groups() {
            checks.push(table.bind(&mut graph, event, pairs, logger.as_ref()));
        }

        let current = graph.node_index(&initial);
        if current.is_none() {
            checks.push(Validation::fail(StructuralError::InvalidInitialState {
                state: initial.clone(),
            }));
        }

        if let Validation::Failure(violations) = Validation::all_vec(checks) {
            return Err(BuildError::Structural(
                violations.iter().cloned().collect(),
            ));
        }
        let Some(current) = current else {
            return Err(BuildError::Structural(vec![
                StructuralError::InvalidInitialState { state: initial },
            ]));
        };

        let fsm = Self {
            graph,
            table,
            current,
            cursor: CurrentState::new(initial.clone()),
            last_transition: None,
            history: TransitionHistory::with_capacity(options.history_capacity),
            logger,
            visualizer: options.visualizer,
        };

        // bootstrap: entry only, no exit and no transition record
        fsm.run_hook(current, Hook::Entry)
            .map_err(|source| BuildError::InitialEntry {
                state: initial,
                source,
            })?;

        Ok(fsm)
    }

    /// Fire `event` against the current state.
    ///
    /// With no transition bound, nothing happens and the current state is
    /// returned. Otherwise the current state's exit action runs, the pointer
    /// moves, then the destination's entry action runs; a self-loop does all
    /// three on the same state.
    ///
    /// An action error is returned unchanged. A failing exit leaves the
    /// pointer where it was and logs no transition; a failing entry leaves it
    /// already moved.
    pub fn fire_event(&mut self, event: &Event) -> Result<Fired, ActionError> {
        self.dispatch(event, false)
    }

    /// [`Fsm::fire_event`], then render the machine with the configured
    /// visualizer, highlighting the edge just traversed.
    ///
    /// Rendering problems are logged and yield `rendering: None`; they never
    /// affect the dispatch itself.
    pub fn fire_event_and_render(&mut self, event: &Event) -> Result<Fired, ActionError> {
        self.dispatch(event, true)
    }

    fn dispatch(&mut self, event: &Event, render: bool) -> Result<Fired, ActionError> {
        let source = self.current;
        let source_id = self.graph.state(source).id().clone();

        let Some(dest) = self.table.lookup(event, source) else {
            self.logger.log(&LogRecord::NoTransition {
                state: source_id.clone(),
                event: event.clone(),
            });
            return Ok(Fired {
                rendering: self.maybe_render(render, None),
                state: source_id,
                outcome: Outcome::Unchanged,
            });
        };

        let dest_id = self.graph.state(dest).id().clone();
        let outcome = if dest == source {
            Outcome::SelfLoop
        } else {
            Outcome::Transitioned {
                from: source_id.clone(),
            }
        };

        self.transit(event, dest)?;

        Ok(Fired {
            rendering: self.maybe_render(render, Some((source_id, dest_id.clone()))),
            state: dest_id,
            outcome,
        })
    }

    // exit, move the pointer, enter; this order is observable from actions.
    // The transition is logged only once the exit action has succeeded.
    fn transit(&mut self, event: &Event, dest: NodeIndex) -> Result<(), ActionError> {
        let source = self.current;
        self.run_hook(source, Hook::Exit)?;

        let fired = FiredTransition {
            event: event.clone(),
            from: self.graph.state(source).id().clone(),
            to: self.graph.state(dest).id().clone(),
            timestamp: Utc::now(),
        };
        self.logger.log(&if fired.is_self_loop() {
            LogRecord::SelfLoop {
                state: fired.to.clone(),
                event: event.clone(),
            }
        } else {
            LogRecord::Transition {
                from: fired.from.clone(),
                to: fired.to.clone(),
                event: event.clone(),
            }
        });

        self.current = dest;
        self.cursor.set(fired.to.clone());
        self.history.record(fired.clone());
        self.last_transition = Some(fired);

        self.run_hook(dest, Hook::Entry)
    }

    fn run_hook(&self, node: NodeIndex, hook: Hook) -> Result<(), ActionError> {
        let state = self.graph.state(node);
        let bound = match hook {
            Hook::Entry => state.has_entry_action(),
            Hook::Exit => state.has_exit_action(),
        };
        if !bound {
            return Ok(());
        }
        self.logger.log(&LogRecord::ActionInvoked {
            state: state.id().clone(),
            hook,
        });
        match hook {
            Hook::Entry => state.enter(),
            Hook::Exit => state.exit(),
        }
    }

    fn maybe_render(
        &self,
        requested: bool,
        last_edge: Option<(StateId, StateId)>,
    ) -> Option<Rendering> {
        if !requested {
            return None;
        }
        let visualizer = self.visualizer.as_ref()?;
        match visualizer.render(&self.view_with(last_edge)) {
            Ok(bytes) => Some(Rendering {
                media_type: visualizer.media_type(),
                bytes,
            }),
            Err(err) => {
                self.logger.log(&LogRecord::RenderFailed {
                    error: err.to_string(),
                });
                None
            }
        }
    }

    /// Render the machine now, highlighting the most recent transition.
    pub fn render(&self) -> Option<Rendering> {
        let last_edge = self
            .last_transition
            .as_ref()
            .map(|t| (t.from.clone(), t.to.clone()));
        self.maybe_render(true, last_edge)
    }

    /// Snapshot for visualizers, highlighting the most recent transition.
    pub fn view(&self) -> GraphView {
        let last_edge = self
            .last_transition
            .as_ref()
            .map(|t| (t.from.clone(), t.to.clone()));
        self.view_with(last_edge)
    }

    fn view_with(&self, last_edge: Option<(StateId, StateId)>) -> GraphView {
        GraphView {
            states: self.graph.states().map(|s| s.id().clone()).collect(),
            edges: self
                .graph
                .edges()
                .map(|edge| EdgeView {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    event: edge.event.clone(),
                })
                .collect(),
            current: self.current_state_id().clone(),
            last_edge,
        }
    }

    pub fn current_state(&self) -> &State {
        self.graph.state(self.current)
    }

    pub fn current_state_id(&self) -> &StateId {
        self.current_state().id()
    }

    /// Handle that tracks the current state, usable from inside actions.
    pub fn current_state_handle(&self) -> CurrentState {
        self.cursor.clone()
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &State> + '_ {
        self.graph.states()
    }

    pub fn state(&self, id: &StateId) -> Option<&State> {
        self.graph.get(id)
    }

    pub fn contains_state(&self, id: &StateId) -> bool {
        self.graph.contains(id)
    }

    /// Event-labelled edges of the underlying graph.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> + '_ {
        self.graph.edges()
    }

    /// Events with at least one binding.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.table.events()
    }

    /// Destination bound for `event` in `state`, if any.
    pub fn transition_for(&self, event: &Event, state: &StateId) -> Option<&StateId> {
        let source = self.graph.node_index(state)?;
        let dest = self.table.lookup(event, source)?;
        Some(self.graph.state(dest).id())
    }

    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    /// Most recent transition taken, self-loops included.
    pub fn last_transition(&self) -> Option<&FiredTransition> {
        self.last_transition.as_ref()
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }
}

impl fmt::Debug for Fsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("current", self.current_state_id())
            .field("states", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("bindings", &self.table.len())
            .finish_non_exhaustive()
    }
}
