//! Dependency graph builder
//!
//! Each declared type is weighed independently, so sources are processed
//! in parallel with no shared mutable state. A reference only counts when
//! its target is a declared type other than the source itself.

use crate::models::{DependencyGraph, ProgramModel, ReferenceOccurrence, WeightMap};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Build the dependency graph for every declared type of `model`.
///
/// The result has exactly one entry per declared type, including types
/// whose weight map ends up empty.
pub fn build_dependency_graph(model: &ProgramModel) -> DependencyGraph {
    let nodes: BTreeMap<String, WeightMap> = model
        .sources()
        .par_iter()
        .map(|(source, occurrences)| {
            let weights = weigh_occurrences(source, occurrences, |name| model.contains(name));
            (source.clone(), weights)
        })
        .collect();

    DependencyGraph::from_nodes(nodes)
}

/// Weigh the occurrences of a single source type.
///
/// `is_declared` decides universe membership. Targets outside the universe
/// and self-references are skipped before counting; every remaining target
/// gets `count / total_qualifying`.
pub fn weigh_occurrences<F>(
    source: &str,
    occurrences: &[ReferenceOccurrence],
    is_declared: F,
) -> WeightMap
where
    F: Fn(&str) -> bool,
{
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    let mut total_qualifying: usize = 0;

    for occurrence in occurrences {
        let target = occurrence.target.as_str();
        if target == source || !is_declared(target) {
            continue;
        }
        *counts.entry(target).or_insert(0) += 1;
        total_qualifying += 1;
    }

    if total_qualifying == 0 {
        return WeightMap::new();
    }

    let total = total_qualifying as f64;
    counts
        .into_iter()
        .map(|(target, count)| (target.to_string(), count as f64 / total))
        .collect()
}
