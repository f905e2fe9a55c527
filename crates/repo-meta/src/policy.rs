//! Which paths are mirrored into the metadata index

use repo_fs::{ConfigStore, ContentPath, FileHandles, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Configuration of the synchronization predicate.
///
/// A path is synchronized when it lies strictly beneath `upload_path`, is not
/// inside one of the `exclude` folders, and no folder between the upload
/// directory and the path (inclusive) carries a `nosync_marker` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncPolicy {
    /// Root-relative upload directory
    pub upload_path: NormalizedPath,
    /// Folders relative to `upload_path` that are never synchronized
    pub exclude: Vec<NormalizedPath>,
    /// Name of the opt-out marker file
    pub nosync_marker: String,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            upload_path: NormalizedPath::new(ContentPath::UploadDir.as_str()),
            exclude: Vec::new(),
            nosync_marker: ContentPath::NoSyncMarker.as_str().to_string(),
        }
    }
}

impl SyncPolicy {
    /// Policy for the given upload directory with no exclusions.
    pub fn with_upload_path(upload_path: impl Into<NormalizedPath>) -> Self {
        Self {
            upload_path: upload_path.into(),
            ..Self::default()
        }
    }

    /// Add an excluded folder, relative to the upload directory.
    pub fn exclude(mut self, folder: impl Into<NormalizedPath>) -> Self {
        self.exclude.push(folder.into());
        self
    }

    /// Load the policy from a TOML, JSON or YAML file, defaulting when absent.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(path)?)
    }

    /// Decide whether `path` belongs to the synchronized tree.
    pub fn should_be_synchronized(&self, files: &dyn FileHandles, path: &NormalizedPath) -> bool {
        if path == &self.upload_path || !path.starts_with_dir(&self.upload_path) {
            return false;
        }

        let excluded = self
            .exclude
            .iter()
            .map(|folder| self.upload_path.join(folder.as_str()))
            .any(|folder| path.starts_with_dir(&folder));
        if excluded {
            return false;
        }

        if self.nosync_marker.is_empty() {
            return true;
        }

        let upload_depth = self.upload_path.segments().count();
        !path
            .ancestors_inclusive()
            .iter()
            .skip(upload_depth.saturating_sub(1))
            .any(|dir| files.is_file(&dir.join(&self.nosync_marker)))
    }
}
