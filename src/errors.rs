//! Failure modes of a single rename invocation.
//! Every variant is terminal: the binary prints it as one line and exits non-zero.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::mime_gate::UnsupportedType;
use crate::providers::GenerationError;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("{0} invalid. Please set the {0} environment variable.")]
    MissingApiKey(&'static str),

    #[error("Failed to detect mime type for {path}: {source}")]
    TypeDetection {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Validation failed: {0}")]
    UnsupportedType(#[from] UnsupportedType),

    #[error("Failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("AI generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("No free name for {candidate} after {attempts} attempts")]
    CollisionLimit { candidate: String, attempts: u32 },

    #[error("Input error: failed to read user input: {0}")]
    Input(#[source] io::Error),

    #[error("Rename failed: {from} -> {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Interrupted before the rename was attempted")]
    Interrupted,
}
