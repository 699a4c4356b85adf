//! Error types for log assertion operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that escape an assertion rule.
///
/// Only genuine I/O failures are represented here. Content mismatches
/// (wrong text, missing keywords, no closure, absent baseline) are folded
/// into a failing [`AssertionVerdict`](crate::AssertionVerdict) instead.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("artifact unreadable: {}: {source}", path.display())]
    ArtifactUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    pub(crate) fn unreadable(path: &Path, source: std::io::Error) -> Self {
        CheckError::ArtifactUnreadable {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the artifact that could not be read.
    pub fn path(&self) -> &Path {
        match self {
            CheckError::ArtifactUnreadable { path, .. } => path,
        }
    }
}

/// Result type for assertion operations.
pub type Result<T> = std::result::Result<T, CheckError>;
