//! The authoritative `(event, source) -> destination` lookup.

use super::{NodeIndex, StateGraph, StructuralError};
use crate::core::{Event, StateId};
use crate::logging::{FsmLogger, LogRecord};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Maps each `(event, source)` pair to at most one destination.
///
/// Rebinding a pair is allowed: the newest destination wins and a
/// [`LogRecord::Redefinition`] warning is emitted.
#[derive(Debug, Default)]
pub struct TransitionTable {
    table: HashMap<Event, HashMap<NodeIndex, NodeIndex>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every `(source, dest)` pair in `edges` to `event`.
    ///
    /// Pairs naming an undeclared state are skipped and reported, one
    /// violation per undeclared endpoint; the remaining pairs are still bound
    /// so that all problems of a definition surface together. Each bound pair
    /// also sets the `source -> dest` edge of `graph`, labelled with `event`.
    pub fn bind(
        &mut self,
        graph: &mut StateGraph,
        event: &Event,
        edges: &[(StateId, StateId)],
        logger: &dyn FsmLogger,
    ) -> Validation<(), NonEmptyVec<StructuralError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<StructuralError>>> =
            Vec::with_capacity(edges.len());

        for (source, dest) in edges {
            let (from, to) = match (graph.node_index(source), graph.node_index(dest)) {
                (Some(from), Some(to)) => (from, to),
                (from, to) => {
                    for (id, node) in [(source, from), (dest, to)] {
                        if node.is_none() {
                            checks.push(Validation::fail(StructuralError::InvalidReference {
                                event: event.clone(),
                                state: id.clone(),
                            }));
                        }
                    }
                    continue;
                }
            };

            let previous = self
                .table
                .entry(event.clone())
                .or_default()
                .insert(from, to);
            if let Some(previous) = previous {
                logger.log(&LogRecord::Redefinition {
                    event: event.clone(),
                    state: source.clone(),
                    previous: graph.state(previous).id().clone(),
                    replacement: dest.clone(),
                });
            }

            if let Some(label) = graph.set_edge(from, to, event.clone()) {
                if &label != event {
                    logger.log(&LogRecord::EdgeRelabeled {
                        from: source.clone(),
                        to: dest.clone(),
                        previous: label,
                        replacement: event.clone(),
                    });
                }
            }

            checks.push(Validation::success(()));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Destination bound for `event` in `source`, or `None` when the event is
    /// not handled there. A self-loop returns `Some(source)`.
    pub fn lookup(&self, event: &Event, source: NodeIndex) -> Option<NodeIndex> {
        self.table.get(event)?.get(&source).copied()
    }

    /// Events with at least one binding.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.table.keys()
    }

    /// Total number of `(event, source)` bindings.
    pub fn len(&self) -> usize {
        self.table.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use crate::logging::MemoryLogger;
    use tracing::Level;

    fn graph_of(ids: &[&str]) -> StateGraph {
        let mut graph = StateGraph::new();
        for id in ids {
            graph.add_node(State::new(*id)).unwrap();
        }
        graph
    }

    fn pair(a: &str, b: &str) -> (StateId, StateId) {
        (StateId::new(a), StateId::new(b))
    }

    fn node(graph: &StateGraph, id: &str) -> NodeIndex {
        graph.node_index(&StateId::new(id)).unwrap()
    }

    #[test]
    fn bind_then_lookup() {
        let mut graph = graph_of(&["a", "b"]);
        let mut table = TransitionTable::new();
        let logger = MemoryLogger::new();
        let e0 = Event::new("e0");

        let result = table.bind(&mut graph, &e0, &[pair("a", "b")], &logger);

        assert!(result.is_success());
        assert_eq!(table.lookup(&e0, node(&graph, "a")), Some(node(&graph, "b")));
        assert_eq!(table.lookup(&e0, node(&graph, "b")), None);
        assert_eq!(table.lookup(&Event::new("other"), node(&graph, "a")), None);
        assert_eq!(graph.edge_count(), 1);
        assert!(logger.records().is_empty());
    }

    #[test]
    fn self_loop_is_distinct_from_absent() {
        let mut graph = graph_of(&["a"]);
        let mut table = TransitionTable::new();
        let hold = Event::new("hold");

        let _ = table.bind(&mut graph, &hold, &[pair("a", "a")], &MemoryLogger::new());

        let a = node(&graph, "a");
        assert_eq!(table.lookup(&hold, a), Some(a));
        assert_eq!(table.lookup(&Event::new("go"), a), None);
    }

    #[test]
    fn rebinding_warns_and_newest_wins() {
        let mut graph = graph_of(&["a", "b", "c"]);
        let mut table = TransitionTable::new();
        let logger = MemoryLogger::new();
        let e0 = Event::new("e0");

        let _ = table.bind(&mut graph, &e0, &[pair("a", "b")], &logger);
        let result = table.bind(&mut graph, &e0, &[pair("a", "c")], &logger);

        assert!(result.is_success());
        assert_eq!(table.lookup(&e0, node(&graph, "a")), Some(node(&graph, "c")));
        assert_eq!(table.len(), 1);

        let warnings = logger.at_level(Level::WARN);
        assert_eq!(
            warnings,
            vec![LogRecord::Redefinition {
                event: e0,
                state: StateId::new("a"),
                previous: StateId::new("b"),
                replacement: StateId::new("c"),
            }]
        );
        // the superseded edge stays in the graph
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn undeclared_states_are_all_reported() {
        let mut graph = graph_of(&["a"]);
        let mut table = TransitionTable::new();
        let e0 = Event::new("e0");

        let result = table.bind(
            &mut graph,
            &e0,
            &[pair("a", "ghost"), pair("nowhere", "nothing"), pair("a", "a")],
            &MemoryLogger::new(),
        );

        match result {
            Validation::Failure(errors) => {
                let states: Vec<_> = errors
                    .iter()
                    .map(|e| match e {
                        StructuralError::InvalidReference { state, .. } => state.as_str(),
                        other => panic!("unexpected violation {other:?}"),
                    })
                    .collect();
                assert_eq!(states, vec!["ghost", "nowhere", "nothing"]);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
        // the valid pair was still bound, the invalid ones were not
        assert_eq!(table.len(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn shared_edge_is_relabeled_but_both_events_dispatch() {
        let mut graph = graph_of(&["a", "b"]);
        let mut table = TransitionTable::new();
        let logger = MemoryLogger::new();
        let (e0, e1) = (Event::new("e0"), Event::new("e1"));

        let _ = table.bind(&mut graph, &e0, &[pair("a", "b")], &logger);
        let _ = table.bind(&mut graph, &e1, &[pair("a", "b")], &logger);

        let (a, b) = (node(&graph, "a"), node(&graph, "b"));
        assert_eq!(table.lookup(&e0, a), Some(b));
        assert_eq!(table.lookup(&e1, a), Some(b));
        assert_eq!(graph.edge_label(a, b), Some(&e1));
        assert!(matches!(
            logger.records().as_slice(),
            [LogRecord::EdgeRelabeled { .. }]
        ));
    }
}
