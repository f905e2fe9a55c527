//! Managed folder handle
//!
//! A [`Folder`] names one directory of the repository by its root-relative
//! path. Opening a handle guarantees the directory exists; mutating calls do
//! the physical work first and then mirror it into the metadata index.

use repo_fs::NormalizedPath;
use repo_meta::FileRecord;
use uuid::Uuid;

use crate::{FolderContext, Result, hash, protection, size};

/// Handle on one directory of the content repository.
///
/// Handles are cheap, short-lived values. The only cached state is the uuid
/// of the folder's own metadata record, used as a lookup key.
#[derive(Debug, Clone)]
pub struct Folder {
    ctx: FolderContext,
    path: NormalizedPath,
    model: Option<Uuid>,
}

impl Folder {
    /// Open a handle, creating the directory and any missing ancestors.
    ///
    /// `.` and the empty path both name the repository root. Every directory
    /// created along the way is registered with the index when it lies in
    /// the synchronized tree.
    ///
    /// # Errors
    ///
    /// [`Error::NotADirectory`](crate::Error::NotADirectory) if a plain file
    /// exists at `path`; filesystem and index errors are propagated.
    pub fn open(ctx: &FolderContext, path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = ctx.resolver().resolve(path)?;
        let mut folder = Self {
            ctx: ctx.clone(),
            path,
            model: None,
        };

        if !ctx.files().is_dir(&folder.path) {
            folder.create_missing()?;
        }
        Ok(folder)
    }

    fn create_missing(&mut self) -> Result<()> {
        let files = self.ctx.files();
        let sync = self.ctx.sync();

        for segment in self.path.ancestors_inclusive() {
            if files.is_dir(&segment) {
                continue;
            }
            self.ctx.ops().mkdir(&segment)?;
            tracing::debug!(path = %segment, "created folder");

            if let Some(record) = sync.add(&segment)?
                && segment == self.path
            {
                self.model = Some(record.uuid);
            }
        }
        Ok(())
    }

    /// Spawn a handle on `path` sharing this handle's collaborators.
    fn sibling(&self, path: &NormalizedPath) -> Result<Folder> {
        Folder::open(&self.ctx, path.clone())
    }

    fn ensure_parent(&self, target: &NormalizedPath) -> Result<()> {
        let parent = target.dirname();
        if !self.ctx.files().is_dir(&parent) {
            self.sibling(&parent)?;
        }
        Ok(())
    }

    /// True if the directory holds no entries at all, hidden ones included.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.ctx.files().list(&self.path, true)?.is_empty())
    }

    /// Remove everything inside the folder but keep the folder itself.
    ///
    /// In the synchronized tree every descendant record is dropped and the
    /// folder's stored hash is refreshed.
    pub fn purge(&self) -> Result<()> {
        self.ctx.ops().remove_tree(&self.path, true)?;
        self.ctx.sync().purge_descendants(&self.path)?;
        tracing::debug!(path = %self.path, "purged folder");
        Ok(())
    }

    /// Legacy alias of [`purge`](Folder::purge).
    #[deprecated(note = "use `Folder::purge` instead")]
    pub fn clear(&self) -> Result<()> {
        tracing::warn!(path = %self.path, "Folder::clear is deprecated, use Folder::purge");
        self.purge()
    }

    /// Remove the folder and everything inside it.
    pub fn delete(&mut self) -> Result<()> {
        self.ctx.ops().remove_tree(&self.path, false)?;
        self.ctx.sync().delete(&self.path)?;
        self.model = None;
        tracing::debug!(path = %self.path, "deleted folder");
        Ok(())
    }

    /// Change the folder's permission bits; reports failure instead of raising.
    pub fn chmod(&self, mode: u32) -> bool {
        self.ctx.ops().chmod(&self.path, mode)
    }

    /// Rename the folder to `new_path`, creating the target's parent if needed.
    ///
    /// Returns `Ok(false)` when the physical rename fails; the handle then
    /// keeps its old path and the index is left untouched. An index error
    /// after a successful rename is returned with the handle already on
    /// `new_path`.
    pub fn rename_to(&mut self, new_path: impl Into<NormalizedPath>) -> Result<bool> {
        let new_path = self.ctx.resolver().normalize(new_path);
        self.ensure_parent(&new_path)?;

        if !self.ctx.ops().rename(&self.path, &new_path) {
            tracing::warn!(from = %self.path, to = %new_path, "folder rename failed");
            return Ok(false);
        }

        // The handle follows the directory even when mirroring fails
        let mirrored = self.ctx.sync().renamed(&self.path, &new_path);
        self.path = new_path;
        self.model = None;
        if let Some(record) = mirrored? {
            self.model = Some(record.uuid);
        }
        Ok(true)
    }

    /// Copy the folder recursively to `new_path`; this handle keeps its path.
    pub fn copy_to(&self, new_path: impl Into<NormalizedPath>) -> Result<bool> {
        let new_path = self.ctx.resolver().normalize(new_path);
        self.ensure_parent(&new_path)?;

        self.ctx.ops().copy_tree(&self.path, &new_path)?;
        self.ctx.sync().copied(&self.path, &new_path)?;
        Ok(true)
    }

    /// Remove the `.public` marker; a no-op when absent.
    pub fn protect(&self) -> Result<()> {
        protection::protect(self.ctx.files(), &self.path)?;
        Ok(())
    }

    /// Add an empty `.public` marker; a no-op when present.
    pub fn unprotect(&self) -> Result<()> {
        protection::unprotect(self.ctx.files(), &self.path)?;
        Ok(())
    }

    pub fn is_protected(&self) -> bool {
        protection::is_protected(self.ctx.files(), &self.path)
    }

    /// The folder's metadata record, if it is synchronized and indexed.
    ///
    /// A found record's uuid is cached; a miss is not, so the next call
    /// looks again.
    pub fn model(&mut self) -> Result<Option<FileRecord>> {
        let sync = self.ctx.sync();
        if let Some(uuid) = self.model {
            if let Some(record) = sync.find_by_uuid(uuid)? {
                return Ok(Some(record));
            }
            self.model = None;
        }

        if !sync.should_sync(&self.path) {
            return Ok(None);
        }
        let record = sync.find(&self.path)?;
        self.model = record.as_ref().map(|record| record.uuid);
        Ok(record)
    }

    /// Structural fingerprint of the folder, recomputed on every call.
    pub fn hash(&self) -> Result<String> {
        hash::structural_hash(&self.ctx.resolver().absolute(&self.path))
    }

    /// Total byte size of visible files below the folder, recomputed on every call.
    pub fn size(&self) -> Result<u64> {
        size::folder_size(&self.ctx.resolver().absolute(&self.path))
    }

    /// Final path segment; empty for the root.
    pub fn name(&self) -> &str {
        self.path.file_name().unwrap_or_default()
    }

    /// Alias of [`name`](Folder::name).
    pub fn basename(&self) -> &str {
        self.name()
    }

    /// The root-relative path.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Alias of [`path`](Folder::path).
    pub fn value(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn is_synchronized(&self) -> bool {
        self.ctx.sync().should_sync(&self.path)
    }

    /// Legacy alias of [`is_synchronized`](Folder::is_synchronized).
    #[deprecated(note = "use `SyncCoordinator::should_sync` instead")]
    pub fn should_be_synchronized(&self) -> bool {
        tracing::warn!(
            path = %self.path,
            "Folder::should_be_synchronized is deprecated, use SyncCoordinator::should_sync"
        );
        self.is_synchronized()
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}
