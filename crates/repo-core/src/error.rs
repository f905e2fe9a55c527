//! Error types for repo-core

use std::path::PathBuf;

/// Result type for repo-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in repo-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A folder handle was requested for a path holding a plain file
    #[error("File \"{path}\" is not a directory")]
    NotADirectory { path: String },

    /// Directory traversal failed while hashing
    #[error("Failed to traverse {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from repo-fs
    #[error(transparent)]
    Fs(#[from] repo_fs::Error),

    /// Metadata index error from repo-meta
    #[error(transparent)]
    Meta(#[from] repo_meta::Error),
}
