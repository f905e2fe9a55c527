//! Metadata record for one tracked file or folder

use chrono::{DateTime, Utc};
use repo_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a record stands for a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    File,
    Folder,
}

/// The index's representation of one tracked entry.
///
/// Records are keyed by `path`; `uuid` is stable across moves and is what
/// callers hold on to when they want a lookup key that survives renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub uuid: Uuid,
    /// Record of the containing folder, `None` directly under the upload directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<Uuid>,
    pub path: NormalizedPath,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub kind: RecordKind,
    /// Content hash; empty until first computed
    #[serde(default)]
    pub hash: String,
    pub tstamp: DateTime<Utc>,
}

impl FileRecord {
    /// Create a record with a fresh uuid and the current timestamp.
    pub fn new(path: NormalizedPath, kind: RecordKind, pid: Option<Uuid>) -> Self {
        let mut record = Self {
            uuid: Uuid::new_v4(),
            pid,
            path: NormalizedPath::root(),
            name: String::new(),
            extension: None,
            kind,
            hash: String::new(),
            tstamp: Utc::now(),
        };
        record.set_path(path);
        record
    }

    /// Re-point the record at `path`, deriving name and extension.
    pub fn set_path(&mut self, path: NormalizedPath) {
        self.name = path.file_name().unwrap_or_default().to_string();
        self.extension = match self.kind {
            RecordKind::File => path.extension().map(str::to_lowercase),
            RecordKind::Folder => None,
        };
        self.path = path;
        self.tstamp = Utc::now();
    }

    pub fn is_folder(&self) -> bool {
        self.kind == RecordKind::Folder
    }
}
