//! Core data models for typegraph
//!
//! The program model is what the collector hands to the graph builder:
//! the universe of declared type names plus, per declared type, every
//! type reference found inside its declaration. The dependency graph is
//! what the builder hands back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One mention of a type symbol inside a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceOccurrence {
    /// Qualified name of the enclosing declared type
    pub source: String,
    /// Resolved name of the referenced symbol (may lie outside the universe)
    pub target: String,
}

impl ReferenceOccurrence {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Errors raised while assembling a [`ProgramModel`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("reference from undeclared type '{source_type}' to '{target}'")]
    UndeclaredSource { source_type: String, target: String },
}

/// The complete, immutable input to the graph builder.
///
/// Keys are the universe of declared types; every declared type has an
/// entry, possibly with no occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramModel {
    references: BTreeMap<String, Vec<ReferenceOccurrence>>,
}

impl ProgramModel {
    /// Start assembling a model
    pub fn builder() -> ProgramModelBuilder {
        ProgramModelBuilder::default()
    }

    /// Whether `name` is a declared type of the project
    pub fn contains(&self, name: &str) -> bool {
        self.references.contains_key(name)
    }

    /// Declared type names, in sorted order
    pub fn universe(&self) -> impl Iterator<Item = &str> {
        self.references.keys().map(String::as_str)
    }

    /// Occurrences recorded for `source` (empty for unknown names)
    pub fn occurrences(&self, source: &str) -> &[ReferenceOccurrence] {
        self.references
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Declared types paired with their occurrence lists
    pub fn sources(&self) -> &BTreeMap<String, Vec<ReferenceOccurrence>> {
        &self.references
    }

    /// Number of declared types
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Total number of recorded occurrences across all declared types
    pub fn occurrence_count(&self) -> usize {
        self.references.values().map(Vec::len).sum()
    }
}

/// Mutable staging area for a [`ProgramModel`].
#[derive(Debug, Default)]
pub struct ProgramModelBuilder {
    references: BTreeMap<String, Vec<ReferenceOccurrence>>,
}

impl ProgramModelBuilder {
    /// Add a declared type. Returns `false` if it was already declared.
    pub fn declare(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.references.contains_key(&name) {
            return false;
        }
        self.references.insert(name, Vec::new());
        true
    }

    /// Append an occurrence to its source's list
    pub fn record(&mut self, occurrence: ReferenceOccurrence) -> Result<(), ModelError> {
        match self.references.get_mut(&occurrence.source) {
            Some(list) => {
                list.push(occurrence);
                Ok(())
            }
            None => Err(ModelError::UndeclaredSource {
                source_type: occurrence.source,
                target: occurrence.target,
            }),
        }
    }

    /// Freeze the model
    pub fn build(self) -> ProgramModel {
        ProgramModel {
            references: self.references,
        }
    }
}

/// Normalized coupling weights of one source type, keyed by target name
pub type WeightMap = BTreeMap<String, f64>;

/// Summary counts of a [`DependencyGraph`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Declared types (graph nodes)
    pub types: usize,
    /// Weighted edges across all sources
    pub edges: usize,
    /// Types with an empty weight map
    pub isolated: usize,
}

/// Per-type relative-frequency distribution over the declared types it uses.
///
/// Serializes as a JSON object of objects, keyed by qualified name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, WeightMap>,
}

impl DependencyGraph {
    pub(crate) fn from_nodes(nodes: BTreeMap<String, WeightMap>) -> Self {
        Self { nodes }
    }

    /// Weight map of a declared type
    pub fn weights(&self, source: &str) -> Option<&WeightMap> {
        self.nodes.get(source)
    }

    /// Weight of a single edge, if present
    pub fn weight(&self, source: &str, target: &str) -> Option<f64> {
        self.nodes.get(source)?.get(target).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &WeightMap)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(BTreeMap::len).sum()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            types: self.nodes.len(),
            edges: self.edge_count(),
            isolated: self.nodes.values().filter(|w| w.is_empty()).count(),
        }
    }
}
