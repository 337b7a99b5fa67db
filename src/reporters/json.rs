//! JSON reporter
//!
//! One object keyed by source type; each value maps target types to weights.

use crate::models::DependencyGraph;
use anyhow::Result;

/// Render the graph as compact JSON (single line)
pub fn render(graph: &DependencyGraph) -> Result<String> {
    Ok(serde_json::to_string(graph)?)
}

/// Render the graph as pretty-printed JSON
pub fn render_pretty(graph: &DependencyGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}
