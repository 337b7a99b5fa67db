//! Project-level configuration support
//!
//! Loads per-project configuration from `typegraph.toml` or
//! `.typegraphrc.json` in the project root.
//!
//! # Configuration Format
//!
//! ```toml
//! # typegraph.toml
//!
//! [collector]
//! nested_types = true   # member types are declared types of their own
//!
//! [exclude]
//! paths = ["generated/", "**/fixtures/**"]   # gitignore-style globs
//! skip_defaults = false
//!
//! [output]
//! pretty = true
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Build and tool output directories skipped unless `skip_defaults = true`.
///
/// A directory with one of these names under a source root (`src/` or
/// `java/`) is a package directory such as `com/acme/build`, and is kept.
pub const DEFAULT_OUTPUT_DIRS: &[&str] = &["target", "build", "out", ".gradle", "node_modules"];

/// Path components that mark a source root
const SOURCE_ROOT_DIRS: &[&str] = &["src", "java"];

/// Project-level configuration loaded from typegraph.toml or similar
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Reference collection settings
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Path exclusion patterns
    #[serde(default)]
    pub exclude: ExcludeConfig,

    /// JSON output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// How declared types and their references are collected
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Treat member (nested) types as declared types of their own.
    ///
    /// Off by default: only top-level types are declared, and references
    /// inside member types count toward the enclosing top-level type.
    #[serde(default)]
    pub nested_types: bool,
}

/// Path exclusion configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ExcludeConfig {
    /// Gitignore-style globs to exclude from analysis
    #[serde(default)]
    pub paths: Vec<String>,

    /// If true, keep build output directories (`target/`, `build/`, ...)
    #[serde(default)]
    pub skip_defaults: bool,
}

impl ExcludeConfig {
    /// Whether a directory, relative to the project root, is build output.
    ///
    /// Always false when `skip_defaults` is set.
    pub fn is_build_output(&self, relative_dir: &Path) -> bool {
        if self.skip_defaults {
            return false;
        }
        let Some(name) = relative_dir.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if !DEFAULT_OUTPUT_DIRS.contains(&name) {
            return false;
        }
        let under_source_root = relative_dir.parent().is_some_and(|parent| {
            parent
                .components()
                .any(|c| SOURCE_ROOT_DIRS.iter().any(|root| c.as_os_str() == *root))
        });
        !under_source_root
    }
}

/// Output settings
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Indent the JSON output instead of writing a single line
    #[serde(default)]
    pub pretty: bool,
}

/// Load project configuration from the project root.
///
/// Tries `typegraph.toml` first, then `.typegraphrc.json`. A file that
/// fails to load is logged and skipped; with no usable file the defaults
/// are returned.
pub fn load_project_config(project_path: &Path) -> ProjectConfig {
    let toml_path = project_path.join("typegraph.toml");
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = project_path.join(".typegraphrc.json");
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}
