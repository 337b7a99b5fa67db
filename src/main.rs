//! Typegraph - weighted type-dependency graphs for Java projects
//!
//! Prints (or writes) a JSON object mapping every declared type to the
//! normalized frequencies of the other declared types it references.

mod cli;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the graph
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let invocation = match cli::parse_args(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => e.exit(),
    };
    cli::run(invocation)
}
