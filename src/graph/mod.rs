//! Weighted type-dependency graph
//!
//! Turns a [`ProgramModel`](crate::models::ProgramModel) into a
//! [`DependencyGraph`](crate::models::DependencyGraph): one relative-frequency
//! distribution per declared type over the other declared types it references.

pub mod builder;

pub use builder::{build_dependency_graph, weigh_occurrences};
