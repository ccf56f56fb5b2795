//! Graphviz DOT output.

use super::{GraphView, RenderError, Visualizer};
use std::fmt::Write;

/// Renders a [`GraphView`] as a Graphviz `digraph`.
///
/// The active state is filled green and the others gray; the label of the
/// last traversed edge is drawn larger and in blue.
#[derive(Clone, Debug)]
pub struct DotVisualizer {
    pub name: String,
    pub rankdir: &'static str,
}

impl Default for DotVisualizer {
    fn default() -> Self {
        Self {
            name: "StateMachine".to_string(),
            rankdir: "LR",
        }
    }
}

impl DotVisualizer {
    pub fn to_dot(&self, view: &GraphView) -> String {
        let mut dot = format!("digraph {} {{\n", quote(&self.name));
        let _ = writeln!(dot, "  rankdir={};", self.rankdir);
        dot.push_str("  node [shape=circle, style=filled];\n\n");

        for state in &view.states {
            let color = if view.is_current(state) { "green" } else { "gray" };
            let _ = writeln!(dot, "  {} [fillcolor={color}];", quote(state.as_str()));
        }
        dot.push('\n');

        for edge in &view.edges {
            let (size, color) = if view.is_last_edge(edge) {
                (30, "blue")
            } else {
                (20, "black")
            };
            let _ = writeln!(
                dot,
                "  {} -> {} [label={}, fontsize={size}, fontcolor={color}];",
                quote(edge.from.as_str()),
                quote(edge.to.as_str()),
                quote(edge.event.id()),
            );
        }

        dot.push_str("}\n");
        dot
    }
}

impl Visualizer for DotVisualizer {
    fn media_type(&self) -> &'static str {
        "text/vnd.graphviz"
    }

    fn render(&self, view: &GraphView) -> Result<Vec<u8>, RenderError> {
        Ok(self.to_dot(view).into_bytes())
    }
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
