//! Error types for repo-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] repo_fs::Error),

    #[error("No record for {path}")]
    RecordNotFound { path: String },

    #[error("Resource {path} does not exist on disk")]
    ResourceNotFound { path: String },

    #[error("Path {path} is outside the synchronized tree")]
    NotSynchronized { path: String },

    #[error("Unsupported index version {version} in {path}")]
    UnsupportedVersion { path: PathBuf, version: String },

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
