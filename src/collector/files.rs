//! Source file discovery
//!
//! Walks the project with `.gitignore` support, skipping hidden entries,
//! build output directories, anything listed in `.typegraphignore`, and the
//! configured exclusions.

use super::CollectError;
use crate::config::ExcludeConfig;
use crate::parsers::supported_extensions;
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Collect all supported source files under `root`, sorted by path
pub fn collect_source_files(
    root: &Path,
    exclude: &ExcludeConfig,
) -> Result<Vec<PathBuf>, CollectError> {
    let overrides = build_overrides(root, exclude)?;
    let walk_root = root.to_path_buf();
    let build_output = exclude.clone();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(".typegraphignore")
        .overrides(overrides)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir
                && entry
                    .path()
                    .strip_prefix(&walk_root)
                    .is_ok_and(|relative| build_output.is_build_output(relative)))
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if supported_extensions().contains(&ext) {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    debug!("Discovered {} source files under {}", files.len(), root.display());
    Ok(files)
}

/// Exclusion globs become negated overrides, which only ever remove paths
fn build_overrides(root: &Path, exclude: &ExcludeConfig) -> Result<Override, CollectError> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in &exclude.paths {
        if let Err(source) = builder.add(&format!("!{}", pattern)) {
            return Err(CollectError::ExcludePattern {
                pattern: pattern.clone(),
                source,
            });
        }
    }
    builder.build().map_err(|source| CollectError::ExcludePattern {
        pattern: exclude.paths.join(", "),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class X {}").unwrap();
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_collects_java_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/main/java/b/B.java");
        touch(dir.path(), "src/main/java/a/A.java");
        touch(dir.path(), "README.md");
        touch(dir.path(), "src/main/resources/app.properties");

        let files = collect_source_files(dir.path(), &ExcludeConfig::default()).unwrap();
        assert_eq!(
            relative(dir.path(), &files),
            vec!["src/main/java/a/A.java", "src/main/java/b/B.java"]
        );
    }

    #[test]
    fn test_default_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/A.java");
        touch(dir.path(), "build/generated/G.java");
        touch(dir.path(), "module/target/classes/T.java");
        touch(dir.path(), ".hidden/H.java");

        let files = collect_source_files(dir.path(), &ExcludeConfig::default()).unwrap();
        assert_eq!(relative(dir.path(), &files), vec!["src/A.java"]);

        let no_defaults = ExcludeConfig {
            paths: vec![],
            skip_defaults: true,
        };
        let files = collect_source_files(dir.path(), &no_defaults).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_package_named_like_build_output_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/main/java/com/acme/App.java");
        touch(dir.path(), "src/main/java/com/acme/build/Builder.java");
        touch(dir.path(), "src/main/java/com/acme/out/Sink.java");
        touch(dir.path(), "src/main/java/com/acme/target/Goal.java");
        touch(dir.path(), "target/generated-sources/Gen.java");

        let files = collect_source_files(dir.path(), &ExcludeConfig::default()).unwrap();
        assert_eq!(
            relative(dir.path(), &files),
            vec![
                "src/main/java/com/acme/App.java",
                "src/main/java/com/acme/build/Builder.java",
                "src/main/java/com/acme/out/Sink.java",
                "src/main/java/com/acme/target/Goal.java",
            ]
        );
    }

    #[test]
    fn test_user_exclusions_and_ignore_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/A.java");
        touch(dir.path(), "generated/G.java");
        touch(dir.path(), "legacy/L.java");
        fs::write(dir.path().join(".typegraphignore"), "legacy/\n").unwrap();

        let exclude = ExcludeConfig {
            paths: vec!["generated/".to_string()],
            skip_defaults: false,
        };
        let files = collect_source_files(dir.path(), &exclude).unwrap();
        assert_eq!(relative(dir.path(), &files), vec!["src/A.java"]);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let exclude = ExcludeConfig {
            paths: vec!["src/[".to_string()],
            skip_defaults: false,
        };
        let err = collect_source_files(dir.path(), &exclude).unwrap_err();
        assert!(matches!(err, CollectError::ExcludePattern { .. }));
    }
}
