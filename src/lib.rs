//! Modegraph: a graph-backed finite state machine for operating modes
//!
//! A machine is a directed graph whose nodes are [`State`]s and whose edges
//! are labelled by [`Event`]s. Firing an event looks up the current state's
//! transition for it and, if one exists, runs the exit action of the current
//! state, moves the pointer, then runs the entry action of the destination.
//! Firing an event that has no transition is a stable no-op.
//!
//! # Core Concepts
//!
//! - **Event / State**: immutable identifiers; states carry optional
//!   entry/exit [`Action`]s bound at construction
//! - **TransitionTable**: the `(event, source) -> destination` lookup
//! - **Fsm**: the graph, the table and the single mutable current-state pointer
//! - **Collaborators**: an injected [`logging::FsmLogger`] and an optional
//!   [`viz::Visualizer`]
//!
//! # Example
//!
//! ```rust
//! use modegraph::{Event, FsmBuilder, State};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let cooldowns = Arc::new(AtomicUsize::new(0));
//! let counter = cooldowns.clone();
//!
//! let idle = State::new("idle");
//! let boost = State::new("boost").on_exit(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let mut fsm = FsmBuilder::new()
//!     .states([idle.clone(), boost.clone()])
//!     .transition("engage", &idle, &boost)
//!     .transition("release", &boost, &idle)
//!     .initial(&idle)
//!     .build()
//!     .unwrap();
//!
//! fsm.fire_event(&Event::new("engage")).unwrap();
//! fsm.fire_event(&Event::new("release")).unwrap();
//!
//! assert_eq!(fsm.current_state(), &idle);
//! assert_eq!(cooldowns.load(Ordering::SeqCst), 1);
//! ```

pub mod builder;
pub mod core;
pub mod graph;
pub mod logging;
pub mod machine;
pub mod viz;

// Re-export commonly used types
pub use builder::FsmBuilder;
pub use core::{bind, Action, ActionError, Event, State, StateId};
pub use graph::StructuralError;
pub use machine::{BuildError, Fired, Fsm, Outcome, TransitionSpec};
