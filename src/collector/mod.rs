//! Program model collection
//!
//! Discovers the Java sources of a project, parses them in parallel,
//! resolves every type reference, and assembles a [`ProgramModel`] whose
//! universe is the set of declared types.

mod error;
mod files;
mod resolve;

pub use error::CollectError;
pub use files::collect_source_files;
pub use resolve::{Resolver, SymbolTable};

use crate::config::ProjectConfig;
use crate::models::ProgramModel;
use crate::parsers::{parse_file, ParseOptions, SourceUnit};
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Progress callback, invoked with (files parsed, total files)
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Sync + 'a;

/// Build the program model of the project rooted at `root`
pub fn collect(root: &Path, config: &ProjectConfig) -> Result<ProgramModel, CollectError> {
    collect_with_progress(root, config, None)
}

/// Build the program model, reporting parse progress
pub fn collect_with_progress(
    root: &Path,
    config: &ProjectConfig,
    progress: Option<&ProgressFn<'_>>,
) -> Result<ProgramModel, CollectError> {
    if !root.exists() {
        return Err(CollectError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CollectError::NotADirectory(root.to_path_buf()));
    }

    let files = collect_source_files(root, &config.exclude)?;
    let total = files.len();
    info!("Collecting types from {} source files", total);

    let options = ParseOptions {
        nested_types: config.collector.nested_types,
    };
    let parsed = AtomicUsize::new(0);
    let units = files
        .par_iter()
        .map(|path| {
            let unit = parse_file(path, options);
            let done = parsed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(report) = progress {
                report(done, total);
            }
            unit
        })
        .collect::<Result<Vec<SourceUnit>, _>>()?;

    for unit in units.iter().filter(|u| u.has_errors) {
        warn!(
            "Syntax errors in {}; collected what could be recovered",
            unit.path.display()
        );
    }

    assemble(&units)
}

/// Declare every project type, then record the resolved references
fn assemble(units: &[SourceUnit]) -> Result<ProgramModel, CollectError> {
    let table = SymbolTable::from_units(units);
    debug!("Symbol table holds {} type names", table.len());

    let mut builder = ProgramModel::builder();
    for unit in units {
        for declaration in unit.declared_types() {
            if !builder.declare(&declaration.name) {
                warn!(
                    "Type {} declared more than once (again in {}:{}); merging",
                    declaration.name,
                    unit.path.display(),
                    declaration.line
                );
            }
        }
    }

    let occurrences: Vec<_> = units
        .par_iter()
        .flat_map_iter(|unit| Resolver::new(&table, unit).occurrences())
        .collect();

    for occurrence in occurrences {
        builder.record(occurrence)?;
    }

    let model = builder.build();
    info!(
        "Collected {} types with {} type references",
        model.len(),
        model.occurrence_count()
    );
    Ok(model)
}
