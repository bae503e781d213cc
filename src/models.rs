use std::path::{Path, PathBuf};

use crate::naming::ResolvedName;

/// Everything the name generator gets to see about one file.
#[derive(Debug, Clone)]
pub struct RenameRequest {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub mime_type: String,
    /// Current extension including the leading dot, empty when there is none.
    pub extension: String,
}

impl RenameRequest {
    pub fn new(path: &Path, content: Vec<u8>, mime_type: String) -> Self {
        Self {
            path: path.to_path_buf(),
            content,
            mime_type,
            extension: file_extension(path),
        }
    }
}

/// Untrusted model output; must pass through sanitizing and collision
/// resolution before touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameProposal {
    pub filename: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    DryRun { proposed: ResolvedName },
    Cancelled { proposed: ResolvedName },
}

pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
