//! Filesystem primitives for the content repository
//!
//! Provides root-relative path handling, the filesystem collaborator traits
//! consumed by folder handles, and a local-disk implementation of them.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod local;
pub mod ops;
pub mod path;

pub use config::ConfigStore;
pub use constants::ContentPath;
pub use error::{Error, Result};
pub use local::LocalFiles;
pub use ops::{FileHandles, FileOps};
pub use path::NormalizedPath;
