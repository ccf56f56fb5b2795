//! Directed-graph storage for a machine.
//!
//! Nodes are the declared states and edges are event-labelled transitions.
//! The graph is built once during construction and is read-only afterwards;
//! the machine's current state lives outside it, in [`crate::machine::Fsm`].

mod error;
mod table;

pub use error::StructuralError;
pub use table::TransitionTable;

use crate::core::{Event, State, StateId};
use std::collections::{BTreeMap, HashMap};

/// Stable handle to a node of a [`StateGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

/// An event-labelled directed edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge<'a> {
    pub from: &'a StateId,
    pub to: &'a StateId,
    pub event: &'a Event,
}

/// States plus the event-labelled edges between them.
///
/// Each directed pair holds a single label. Binding a second event to the same
/// pair replaces the label; dispatch goes through the [`TransitionTable`] and
/// is unaffected.
#[derive(Debug, Default)]
pub struct StateGraph {
    nodes: Vec<State>,
    index: HashMap<StateId, NodeIndex>,
    edges: BTreeMap<(NodeIndex, NodeIndex), Event>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state as a node, rejecting an id that is already present.
    pub fn add_node(&mut self, state: State) -> Result<NodeIndex, StructuralError> {
        if self.index.contains_key(state.id()) {
            return Err(StructuralError::DuplicateState {
                state: state.id().clone(),
            });
        }
        let node = NodeIndex(self.nodes.len());
        self.index.insert(state.id().clone(), node);
        self.nodes.push(state);
        Ok(node)
    }

    /// Insert or relabel the edge `from -> to`, returning the replaced label.
    pub fn set_edge(&mut self, from: NodeIndex, to: NodeIndex, event: Event) -> Option<Event> {
        self.edges.insert((from, to), event)
    }

    pub fn node_index(&self, id: &StateId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &StateId) -> bool {
        self.index.contains_key(id)
    }

    /// The state stored at `node`.
    ///
    /// Handles are only produced by this graph, so an index from elsewhere is
    /// a caller bug.
    pub fn state(&self, node: NodeIndex) -> &State {
        &self.nodes[node.0]
    }

    pub fn get(&self, id: &StateId) -> Option<&State> {
        self.node_index(id).map(|node| self.state(node))
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &State> + '_ {
        self.nodes.iter()
    }

    pub fn edge_label(&self, from: NodeIndex, to: NodeIndex) -> Option<&Event> {
        self.edges.get(&(from, to))
    }

    /// Edges ordered by source then destination declaration order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> + '_ {
        self.edges.iter().map(|(&(from, to), event)| Edge {
            from: self.state(from).id(),
            to: self.state(to).id(),
            event,
        })
    }

    /// Destinations reachable from `node` in one step, with their labels.
    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, &Event)> + '_ {
        self.edges
            .range((node, NodeIndex(0))..=(node, NodeIndex(usize::MAX)))
            .map(|(&(_, to), event)| (to, event))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
