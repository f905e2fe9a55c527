//! Metadata store abstraction
//!
//! Folder handles consult the store through this trait only, so the index
//! can be swapped for a database-backed implementation.

use repo_fs::NormalizedPath;
use uuid::Uuid;

use crate::{FileRecord, Result};

/// Persistence and query interface of the metadata index.
///
/// Implementations perform no physical filesystem mutation; callers move
/// bytes first and then tell the store what happened.
pub trait MetadataStore: Send + Sync {
    /// Whether `path` lies in a part of the tree mirrored by this store.
    fn should_be_synchronized(&self, path: &NormalizedPath) -> bool;

    /// Register the resource at `path`, returning its record.
    ///
    /// Idempotent: an already registered path returns the existing record.
    fn add_resource(&self, path: &NormalizedPath) -> Result<FileRecord>;

    /// Re-key the record at `old` (and its descendants) to `new`.
    fn move_resource(&self, old: &NormalizedPath, new: &NormalizedPath) -> Result<FileRecord>;

    /// Duplicate the record at `old` (and its descendants) under `new`.
    fn copy_resource(&self, old: &NormalizedPath, new: &NormalizedPath) -> Result<FileRecord>;

    /// Remove the record at `path` and every descendant record.
    fn delete_resource(&self, path: &NormalizedPath) -> Result<Option<FileRecord>>;

    /// Remove exactly one record, leaving descendants untouched.
    fn delete_record(&self, path: &NormalizedPath) -> Result<Option<FileRecord>>;

    /// Recompute the stored hash of `path` and of every ancestor folder.
    fn update_folder_hashes(&self, path: &NormalizedPath) -> Result<()>;

    fn find_by_path(&self, path: &NormalizedPath) -> Result<Option<FileRecord>>;

    fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<FileRecord>>;

    /// Records whose path string starts with `prefix`, ordered by path.
    ///
    /// Returns `None` rather than an empty list when nothing matches.
    fn find_under_prefix(&self, prefix: &str) -> Result<Option<Vec<FileRecord>>>;
}
