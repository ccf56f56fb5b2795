//! The machine: construction, dispatch and introspection.
//!
//! An [`Fsm`] owns an immutable [`crate::graph::StateGraph`] and
//! [`crate::graph::TransitionTable`] plus a single mutable pointer to the
//! current state. [`Fsm::fire_event`] is the only operation that moves the
//! pointer.
//!
//! # Concurrency
//!
//! Dispatch is synchronous and runs to completion, actions included.
//! `fire_event` takes `&mut self`, so sharing a machine between threads needs
//! external serialization such as a `Mutex<Fsm>`.
//!
//! [`CurrentState`] is an observer mirror of the pointer for actions, which
//! cannot borrow the machine while it dispatches. Its lock only guards the
//! mirrored id; it does not serialize dispatch, and the machine never reads
//! it back.

mod error;
mod fsm;
mod spec;

pub use error::BuildError;
pub use fsm::{CurrentState, Fired, Fsm, FsmOptions, Outcome};
pub use spec::TransitionSpec;
