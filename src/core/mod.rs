//! Core identity and action types.
//!
//! This module contains the leaf types of the machine:
//! - `Event` identifiers
//! - `State`s with their entry/exit `Action`s
//! - Bounded dispatch history
//!
//! Nothing here knows about graphs or dispatch; those live in
//! [`crate::graph`] and [`crate::machine`].

mod event;
mod history;
mod state;

pub use event::Event;
pub use history::{FiredTransition, TransitionHistory, DEFAULT_HISTORY_CAPACITY};
pub use state::{bind, Action, ActionError, BoundAction, State, StateId};
