//! CLI argument handling and the analyze run

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use typegraph::collector;
use typegraph::config::load_project_config;
use typegraph::graph::build_dependency_graph;
use typegraph::reporters::{self, OutputFormat};

/// Program name shown in the usage line
pub const PROGRAM_NAME: &str = "typegraph";

/// Typegraph - weighted type-dependency graphs for Java projects
#[derive(Parser, Debug)]
#[command(name = PROGRAM_NAME)]
#[command(
    version,
    about = "Build a weighted type-dependency graph of a Java project and emit it as JSON",
    after_help = "\
Examples:
  typegraph .                          Print the graph of the current directory
  typegraph ./app --json graph.json    Write the graph to graph.json"
)]
pub struct Cli {
    /// Root directory of the Java project
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Write the graph to this file instead of stdout
    #[arg(long = "json", value_name = "OUTPUT_PATH")]
    pub json: Option<PathBuf>,
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Analyze {
        project_dir: PathBuf,
        output: Option<PathBuf>,
    },
    Usage,
}

/// One-line usage message
pub fn usage() -> String {
    format!("USAGE: {} <project-dir> [--json <output-json>]", PROGRAM_NAME)
}

/// Parse arguments; anything malformed or incomplete becomes [`Invocation::Usage`].
///
/// Only `--help` and `--version` come back as errors, for clap to print.
pub fn parse_args<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(Cli {
            project_dir: Some(project_dir),
            json,
        }) => Ok(Invocation::Analyze {
            project_dir,
            output: json,
        }),
        Ok(_) => Ok(Invocation::Usage),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Err(e),
        Err(e) => {
            debug!("Invalid arguments ({}); showing usage", e.kind());
            Ok(Invocation::Usage)
        }
    }
}

/// Dispatch a parsed invocation
pub fn run(invocation: Invocation) -> Result<()> {
    match invocation {
        Invocation::Usage => {
            println!("{}", usage());
            Ok(())
        }
        Invocation::Analyze {
            project_dir,
            output,
        } => analyze(&project_dir, output.as_deref()),
    }
}

/// Collect, weigh, render, and route the graph
fn analyze(project_dir: &Path, output: Option<&Path>) -> Result<()> {
    let config = load_project_config(project_dir);
    debug!("Project config: {:?}", config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(create_spinner_style());
    spinner.set_message("Collecting types...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report_progress = |done: usize, total: usize| {
        if done % 50 == 0 || done == total {
            spinner.set_message(format!("Parsing files {}/{}", done, total));
        }
    };
    let model = collector::collect_with_progress(project_dir, &config, Some(&report_progress));
    spinner.finish_and_clear();
    let model = model
        .with_context(|| format!("Failed to collect types from {}", project_dir.display()))?;

    let graph = build_dependency_graph(&model);
    let stats = graph.stats();
    info!(
        types = stats.types,
        edges = stats.edges,
        isolated = stats.isolated,
        "Built dependency graph"
    );

    let format = OutputFormat::from_pretty(config.output.pretty);
    let rendered = reporters::report(&graph, format)?;

    match output {
        None => println!("{}", rendered),
        Some(path) => write_output(path, &rendered),
    }
    Ok(())
}

/// A failed write is reported but does not fail the run
fn write_output(path: &Path, rendered: &str) {
    match std::fs::write(path, rendered) {
        Ok(()) => info!("Wrote dependency graph to {}", path.display()),
        Err(e) => eprintln!(
            "{} Writing to file {} failed: {}",
            style("error:").red().bold().for_stderr(),
            path.display(),
            e
        ),
    }
}

fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
