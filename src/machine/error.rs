//! Errors raised while constructing a machine.

use crate::core::{ActionError, StateId};
use crate::graph::StructuralError;
use thiserror::Error;

/// Why a machine could not be constructed.
///
/// No partially built machine is ever returned alongside these.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid state machine definition: {}", join(.0))]
    Structural(Vec<StructuralError>),

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Entry action of initial state [{state}] failed")]
    InitialEntry {
        state: StateId,
        #[source]
        source: ActionError,
    },
}

impl BuildError {
    /// Structural violations carried by this error; empty for other kinds.
    pub fn violations(&self) -> &[StructuralError] {
        match self {
            Self::Structural(violations) => violations,
            _ => &[],
        }
    }
}

fn join(violations: &[StructuralError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;
    use std::error::Error as _;

    #[test]
    fn structural_error_lists_every_violation() {
        let err = BuildError::Structural(vec![
            StructuralError::EmptyStateSet,
            StructuralError::InvalidReference {
                event: Event::new("e0"),
                state: StateId::new("ghost"),
            },
        ]);

        assert_eq!(err.violations().len(), 2);
        assert_eq!(
            err.to_string(),
            "Invalid state machine definition: No states declared; a machine needs at least \
             its initial state; Transition on event [e0] references undeclared state [ghost]"
        );
    }

    #[test]
    fn initial_entry_keeps_action_error_as_source() {
        let err = BuildError::InitialEntry {
            state: StateId::new("boot"),
            source: "sensor offline".into(),
        };
        assert!(err.violations().is_empty());
        assert_eq!(err.source().unwrap().to_string(), "sensor offline");
    }
}
