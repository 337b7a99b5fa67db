//! Error types for reference collection

use crate::models::ModelError;
use crate::parsers::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a project from being turned into a program model
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("project directory does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("project path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid exclude pattern '{pattern}': {source}")]
    ExcludePattern {
        pattern: String,
        source: ignore::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
