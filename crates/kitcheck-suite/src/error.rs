//! Error types for suite operations

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Unknown example: {0}")]
    UnknownExample(String),

    #[error("Invalid package kind: '{0}' (valid kinds: comm, pro)")]
    InvalidPackageKind(String),

    #[error("Release number missing: {} has no content", path.display())]
    MissingRelease { path: PathBuf },

    #[error("Kit discovery failed under {}: {source}", root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Check(#[from] kitcheck_core::CheckError),
}

/// Result type for suite operations
pub type Result<T> = std::result::Result<T, SuiteError>;
