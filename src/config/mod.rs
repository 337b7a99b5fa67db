//! Configuration module for typegraph
//!
//! Handles the optional per-project configuration file
//! (`typegraph.toml` or `.typegraphrc.json`) in the analyzed project's root.

mod project_config;

pub use project_config::{
    load_project_config, CollectorConfig, ExcludeConfig, OutputConfig, ProjectConfig,
    DEFAULT_OUTPUT_DIRS,
};
