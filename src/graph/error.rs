//! Structural errors found while building a machine.

use crate::core::{Event, StateId};
use thiserror::Error;

/// A violation of the structural rules of a machine definition.
///
/// Every one of these is fatal to construction; the builder reports all of
/// them at once rather than stopping at the first.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("No states declared; a machine needs at least its initial state")]
    EmptyStateSet,

    #[error("State [{state}] is declared more than once")]
    DuplicateState { state: StateId },

    #[error("Transition on event [{event}] references undeclared state [{state}]")]
    InvalidReference { event: Event, state: StateId },

    #[error("Initial state [{state}] is not a declared state")]
    InvalidInitialState { state: StateId },
}
