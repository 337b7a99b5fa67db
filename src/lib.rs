//! Typegraph - weighted type-dependency graphs for Java projects
//!
//! Collects the declared types of a Java project and every type reference
//! inside them, then reduces each type's references to a relative-frequency
//! distribution over the other declared types.

pub mod collector;
pub mod config;
pub mod graph;
pub mod models;
pub mod parsers;
pub mod reporters;
