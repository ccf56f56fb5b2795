//! Visualization collaborator.
//!
//! The machine never draws anything itself. It hands a [`GraphView`] snapshot
//! (states, labelled edges, the active state and the edge just traversed) to a
//! [`Visualizer`] and returns whatever bytes come back as an opaque
//! [`Rendering`]. Highlighting convention: the active state is drawn apart
//! from inactive ones, and the label of the last traversed edge apart from the
//! other labels.

mod dot;

pub use dot::DotVisualizer;

use crate::core::{Event, StateId};
use serde::Serialize;
use thiserror::Error;

/// Errors a visualizer may report. These never affect dispatch.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to encode graph view: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Renderer backend failed: {0}")]
    Backend(String),
}

/// A labelled edge inside a [`GraphView`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub from: StateId,
    pub to: StateId,
    pub event: Event,
}

/// Everything a renderer needs to draw the machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub states: Vec<StateId>,
    pub edges: Vec<EdgeView>,
    pub current: StateId,
    /// The edge traversed by the fire that requested this view, if any.
    pub last_edge: Option<(StateId, StateId)>,
}

impl GraphView {
    pub fn is_current(&self, state: &StateId) -> bool {
        &self.current == state
    }

    pub fn is_last_edge(&self, edge: &EdgeView) -> bool {
        matches!(&self.last_edge, Some((from, to)) if from == &edge.from && to == &edge.to)
    }
}

/// Opaque output of a [`Visualizer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendering {
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns a [`GraphView`] into an image or document.
pub trait Visualizer: Send + Sync {
    /// Media type of the bytes produced by [`Visualizer::render`].
    fn media_type(&self) -> &'static str;

    fn render(&self, view: &GraphView) -> Result<Vec<u8>, RenderError>;
}

/// Renders the view itself as JSON, for renderers living in another process.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonVisualizer {
    pub pretty: bool,
}

impl Visualizer for JsonVisualizer {
    fn media_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, view: &GraphView) -> Result<Vec<u8>, RenderError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(view)?
        } else {
            serde_json::to_vec(view)?
        };
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_view() -> GraphView {
        GraphView {
            states: vec![StateId::new("a"), StateId::new("b")],
            edges: vec![
                EdgeView {
                    from: StateId::new("a"),
                    to: StateId::new("b"),
                    event: Event::new("e0"),
                },
                EdgeView {
                    from: StateId::new("b"),
                    to: StateId::new("a"),
                    event: Event::new("e1"),
                },
            ],
            current: StateId::new("b"),
            last_edge: Some((StateId::new("a"), StateId::new("b"))),
        }
    }

    #[test]
    fn view_reports_highlights() {
        let view = sample_view();
        assert!(view.is_current(&StateId::new("b")));
        assert!(!view.is_current(&StateId::new("a")));
        assert!(view.is_last_edge(&view.edges[0]));
        assert!(!view.is_last_edge(&view.edges[1]));
    }

    #[test]
    fn json_visualizer_encodes_view() {
        let bytes = JsonVisualizer::default().render(&sample_view()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["current"], "b");
        assert_eq!(value["edges"][1]["event"], "e1");
        assert_eq!(value["last_edge"][0], "a");
    }
}
