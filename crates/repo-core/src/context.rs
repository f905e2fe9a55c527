//! Collaborators shared by folder handles

use std::path::Path;
use std::sync::Arc;

use repo_fs::{FileHandles, FileOps, LocalFiles, NormalizedPath};
use repo_meta::{FileIndex, MetadataStore, SyncPolicy};

use crate::{PathResolver, Result, SyncCoordinator};

/// The collaborators a [`Folder`](crate::Folder) works through.
///
/// Cloning is cheap; handles keep their own clone so they can spawn handles
/// for parents and subfolders.
#[derive(Clone)]
pub struct FolderContext {
    resolver: PathResolver,
    ops: Arc<dyn FileOps>,
    files: Arc<dyn FileHandles>,
    sync: SyncCoordinator,
}

impl std::fmt::Debug for FolderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderContext")
            .field("root", self.resolver.root())
            .finish_non_exhaustive()
    }
}

impl FolderContext {
    /// Wire explicit collaborators for the repository at `root`.
    pub fn new(
        root: impl Into<NormalizedPath>,
        ops: Arc<dyn FileOps>,
        files: Arc<dyn FileHandles>,
        store: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            resolver: PathResolver::new(root),
            ops,
            files,
            sync: SyncCoordinator::new(store),
        }
    }

    /// Local-disk collaborators and a fresh in-memory index for `root`.
    pub fn local(root: impl AsRef<Path>, policy: SyncPolicy) -> Result<Self> {
        let files = Arc::new(LocalFiles::new(root)?);
        let index = Arc::new(FileIndex::new(files.clone(), policy));
        Ok(Self::with_index(files, index))
    }

    /// Local-disk collaborators around an existing index, e.g. one loaded from disk.
    pub fn with_index(files: Arc<LocalFiles>, index: Arc<FileIndex>) -> Self {
        let root = files.root().clone();
        Self::new(root, files.clone(), files, index)
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn ops(&self) -> &dyn FileOps {
        self.ops.as_ref()
    }

    pub fn files(&self) -> &dyn FileHandles {
        self.files.as_ref()
    }

    pub fn sync(&self) -> &SyncCoordinator {
        &self.sync
    }

    pub fn store(&self) -> &dyn MetadataStore {
        self.sync.store().as_ref()
    }
}
