//! Filesystem collaborator traits
//!
//! Folder handles never touch the disk directly; they go through these two
//! seams so callers can substitute their own storage. All paths are
//! root-relative.

use crate::{NormalizedPath, Result};
use std::path::PathBuf;

/// Directory-tree primitives.
pub trait FileOps: Send + Sync {
    /// Create a single directory. Succeeds if it already exists.
    fn mkdir(&self, path: &NormalizedPath) -> Result<()>;

    /// Recursively remove a directory tree.
    ///
    /// With `keep_root` only the contents are removed and `path` itself stays.
    fn remove_tree(&self, path: &NormalizedPath, keep_root: bool) -> Result<()>;

    /// Rename `old` to `new`, reporting success instead of raising.
    fn rename(&self, old: &NormalizedPath, new: &NormalizedPath) -> bool;

    /// Recursively copy the tree at `old` to `new`.
    fn copy_tree(&self, old: &NormalizedPath, new: &NormalizedPath) -> Result<()>;

    /// Change permission bits, reporting success instead of raising.
    fn chmod(&self, path: &NormalizedPath, mode: u32) -> bool;
}

/// Single-entry primitives.
pub trait FileHandles: Send + Sync {
    /// Create (or truncate) a file with the given content.
    fn create_file(&self, path: &NormalizedPath, content: &[u8]) -> Result<()>;

    /// Delete a single file.
    fn delete_file(&self, path: &NormalizedPath) -> Result<()>;

    /// Byte size of a single file.
    fn file_size(&self, path: &NormalizedPath) -> Result<u64>;

    fn exists(&self, path: &NormalizedPath) -> bool;

    fn is_dir(&self, path: &NormalizedPath) -> bool;

    fn is_file(&self, path: &NormalizedPath) -> bool;

    /// Names of the immediate entries of a directory, sorted.
    ///
    /// Dot-prefixed names are only included when `include_hidden` is set.
    fn list(&self, path: &NormalizedPath, include_hidden: bool) -> Result<Vec<String>>;

    /// Native absolute location of a root-relative path.
    fn absolute(&self, path: &NormalizedPath) -> PathBuf;
}
