//! Output reporters for dependency graphs
//!
//! Supports two renderings of the same JSON document:
//! - compact, single line (default)
//! - pretty, indented for reading and diffing

mod json;

use crate::models::DependencyGraph;
use anyhow::Result;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    PrettyJson,
}

impl OutputFormat {
    /// Format selected by the `[output] pretty` config flag
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            OutputFormat::PrettyJson
        } else {
            OutputFormat::Json
        }
    }
}

/// Render a dependency graph in the specified format
pub fn report(graph: &DependencyGraph, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::render(graph),
        OutputFormat::PrettyJson => json::render_pretty(graph),
    }
}
