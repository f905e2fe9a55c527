//! Mirroring physical folder operations into the metadata index
//!
//! The coordinator never touches the disk. Callers finish the physical
//! operation first and only then report it here, so a failed rename or copy
//! never produces metadata drift.

use std::sync::Arc;

use repo_fs::NormalizedPath;
use repo_meta::{FileRecord, MetadataStore};
use uuid::Uuid;

use crate::Result;

/// Metadata action chosen for a two-path operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Re-key the existing record to the new path
    Move,
    /// Duplicate the record under the new path
    Copy,
    /// Drop the record at the old path
    Delete,
    /// Register a fresh record at the new path
    Add,
    /// Leave the index alone
    Skip,
}

impl SyncAction {
    /// Action for a rename given whether source and target are synchronized.
    pub fn for_rename(source_synced: bool, target_synced: bool) -> Self {
        match (source_synced, target_synced) {
            (true, true) => Self::Move,
            (true, false) => Self::Delete,
            (false, true) => Self::Add,
            (false, false) => Self::Skip,
        }
    }

    /// Action for a copy; an untracked copy target never touches the source record.
    pub fn for_copy(source_synced: bool, target_synced: bool) -> Self {
        match (source_synced, target_synced) {
            (true, true) => Self::Copy,
            (false, true) => Self::Add,
            (_, false) => Self::Skip,
        }
    }
}

/// Decides when the metadata index must follow a folder operation.
#[derive(Clone)]
pub struct SyncCoordinator {
    store: Arc<dyn MetadataStore>,
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator").finish_non_exhaustive()
    }
}

impl SyncCoordinator {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MetadataStore> {
        &self.store
    }

    pub fn should_sync(&self, path: &NormalizedPath) -> bool {
        self.store.should_be_synchronized(path)
    }

    /// Register `path` if it is synchronized.
    pub fn add(&self, path: &NormalizedPath) -> Result<Option<FileRecord>> {
        if !self.should_sync(path) {
            return Ok(None);
        }
        let record = self.store.add_resource(path)?;
        tracing::debug!(path = %path, uuid = %record.uuid, "index add");
        Ok(Some(record))
    }

    /// Mirror a completed rename; returns the record now describing `new`.
    pub fn renamed(&self, old: &NormalizedPath, new: &NormalizedPath) -> Result<Option<FileRecord>> {
        let action = SyncAction::for_rename(self.should_sync(old), self.should_sync(new));
        tracing::debug!(from = %old, to = %new, ?action, "mirroring rename");
        match action {
            SyncAction::Move => Ok(Some(self.store.move_resource(old, new)?)),
            SyncAction::Delete => {
                self.store.delete_resource(old)?;
                Ok(None)
            }
            SyncAction::Add => Ok(Some(self.store.add_resource(new)?)),
            SyncAction::Copy | SyncAction::Skip => Ok(None),
        }
    }

    /// Mirror a completed copy; returns the record created for `new`, if any.
    pub fn copied(&self, old: &NormalizedPath, new: &NormalizedPath) -> Result<Option<FileRecord>> {
        let action = SyncAction::for_copy(self.should_sync(old), self.should_sync(new));
        tracing::debug!(from = %old, to = %new, ?action, "mirroring copy");
        match action {
            SyncAction::Copy => Ok(Some(self.store.copy_resource(old, new)?)),
            SyncAction::Add => Ok(Some(self.store.add_resource(new)?)),
            SyncAction::Move | SyncAction::Delete | SyncAction::Skip => Ok(None),
        }
    }

    /// Drop the record at `path` and its descendants if synchronized.
    pub fn delete(&self, path: &NormalizedPath) -> Result<Option<FileRecord>> {
        if !self.should_sync(path) {
            return Ok(None);
        }
        let removed = self.store.delete_resource(path)?;
        tracing::debug!(path = %path, found = removed.is_some(), "index delete");
        Ok(removed)
    }

    /// Drop every record strictly below `path` and refresh its hash.
    ///
    /// Returns the number of records removed; zero when not synchronized.
    pub fn purge_descendants(&self, path: &NormalizedPath) -> Result<usize> {
        if !self.should_sync(path) {
            return Ok(0);
        }

        let prefix = if path.is_root() {
            String::new()
        } else {
            format!("{}/", path)
        };
        let mut removed = 0;
        for record in self.store.find_under_prefix(&prefix)?.unwrap_or_default() {
            if self.store.delete_record(&record.path)?.is_some() {
                removed += 1;
            }
        }

        self.store.update_folder_hashes(path)?;
        tracing::debug!(path = %path, removed, "index purge");
        Ok(removed)
    }

    /// Recompute the stored hash of `path` and its ancestors if synchronized.
    pub fn refresh_hash(&self, path: &NormalizedPath) -> Result<()> {
        if self.should_sync(path) {
            self.store.update_folder_hashes(path)?;
        }
        Ok(())
    }

    pub fn find(&self, path: &NormalizedPath) -> Result<Option<FileRecord>> {
        Ok(self.store.find_by_path(path)?)
    }

    pub fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<FileRecord>> {
        Ok(self.store.find_by_uuid(uuid)?)
    }
}
