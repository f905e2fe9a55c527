//! In-memory metadata index with TOML persistence
//!
//! The index keeps one [`FileRecord`] per synchronized path in an ordered
//! map. Folder hashes are derived from the indexed children (`name:hash`
//! lines sorted by name), file hashes from the file bytes, so a change
//! anywhere below a folder changes every ancestor's hash.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::RwLock;
use repo_fs::checksum::{compute_file_checksum, compute_joined_checksum};
use repo_fs::{FileHandles, NormalizedPath, io};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, FileRecord, MetadataStore, RecordKind, Result, SyncPolicy};

const INDEX_VERSION: &str = "1.0";

type RecordMap = BTreeMap<NormalizedPath, FileRecord>;

/// On-disk layout of a saved index
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    version: String,
    #[serde(default)]
    records: Vec<FileRecord>,
}

/// Metadata store backed by an in-memory ordered map.
///
/// Reads the physical tree through the [`FileHandles`] collaborator when it
/// needs to discover entries or hash file contents.
pub struct FileIndex {
    files: Arc<dyn FileHandles>,
    policy: SyncPolicy,
    records: RwLock<RecordMap>,
}

impl std::fmt::Debug for FileIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileIndex")
            .field("policy", &self.policy)
            .field("records", &self.records.read().len())
            .finish()
    }
}

impl FileIndex {
    /// Create an empty index.
    pub fn new(files: Arc<dyn FileHandles>, policy: SyncPolicy) -> Self {
        Self {
            files,
            policy,
            records: RwLock::new(RecordMap::new()),
        }
    }

    /// Load a saved index under a shared lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, locked or parsed, or was
    /// written by an incompatible version.
    pub fn load(files: Arc<dyn FileHandles>, policy: SyncPolicy, path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| repo_fs::Error::io(path, e))?;
        file.lock_shared().map_err(|_| repo_fs::Error::LockFailed {
            path: path.to_path_buf(),
        })?;

        // Read through the locked handle
        let mut content = String::new();
        (&file)
            .read_to_string(&mut content)
            .map_err(|e| repo_fs::Error::io(path, e))?;
        let saved: IndexFile = toml::from_str(&content)?;
        if saved.version != INDEX_VERSION {
            return Err(Error::UnsupportedVersion {
                path: path.to_path_buf(),
                version: saved.version,
            });
        }

        let records = saved
            .records
            .into_iter()
            .map(|record| (record.path.clone(), record))
            .collect();
        tracing::debug!(path = %path.display(), "loaded metadata index");

        Ok(Self {
            files,
            policy,
            records: RwLock::new(records),
        })
    }

    /// Save the index atomically.
    ///
    /// Goes through [`repo_fs::io::write_atomic`]: a locked sibling temp file
    /// renamed over the target, removed again if the rename fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let saved = IndexFile {
            version: INDEX_VERSION.to_string(),
            records: self.records(),
        };
        let content = toml::to_string_pretty(&saved)?;
        io::write_atomic(&NormalizedPath::new(path), content.as_bytes())?;
        tracing::debug!(path = %path.display(), records = saved.records.len(), "saved metadata index");
        Ok(())
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Snapshot of every record, ordered by path.
    pub fn records(&self) -> Vec<FileRecord> {
        self.records.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn kind_of(&self, path: &NormalizedPath) -> RecordKind {
        if self.files.is_dir(path) {
            RecordKind::Folder
        } else {
            RecordKind::File
        }
    }

    /// Register every synchronized ancestor folder of `path` that is missing.
    ///
    /// Returns the uuid of the direct parent's record, if it is synchronized.
    fn ensure_parents(&self, map: &mut RecordMap, path: &NormalizedPath) -> Result<Option<Uuid>> {
        let mut pid = None;
        for dir in path.dirname().ancestors_inclusive() {
            if !self.should_be_synchronized(&dir) {
                continue;
            }
            if let Some(existing) = map.get(&dir) {
                pid = Some(existing.uuid);
                continue;
            }
            if !self.files.is_dir(&dir) {
                return Err(Error::ResourceNotFound {
                    path: dir.to_string(),
                });
            }
            let record = FileRecord::new(dir.clone(), RecordKind::Folder, pid);
            tracing::debug!(path = %dir, "registered parent folder");
            pid = Some(record.uuid);
            map.insert(dir, record);
        }
        Ok(pid)
    }

    /// Register `path` and, for folders, every synchronized descendant.
    fn insert_tree(&self, map: &mut RecordMap, path: &NormalizedPath, pid: Option<Uuid>) -> Result<()> {
        let uuid = match map.get(path) {
            Some(existing) => existing.uuid,
            None => {
                let record = FileRecord::new(path.clone(), self.kind_of(path), pid);
                let uuid = record.uuid;
                map.insert(path.clone(), record);
                uuid
            }
        };

        if self.files.is_dir(path) {
            for name in self.files.list(path, false)? {
                let child = path.join(&name);
                if self.should_be_synchronized(&child) {
                    self.insert_tree(map, &child, Some(uuid))?;
                }
            }
        }
        Ok(())
    }

    fn compute_hash(&self, map: &RecordMap, record: &FileRecord) -> Result<String> {
        match record.kind {
            RecordKind::File => {
                let native = self.files.absolute(&record.path);
                compute_file_checksum(&native).map_err(|e| repo_fs::Error::io(native, e).into())
            }
            RecordKind::Folder => {
                let lines = map
                    .values()
                    .filter(|child| child.path != record.path && child.path.dirname() == record.path)
                    .map(|child| format!("{}:{}", child.name, child.hash));
                Ok(compute_joined_checksum(lines, "\n"))
            }
        }
    }

    fn rehash_one(&self, map: &mut RecordMap, path: &NormalizedPath) -> Result<()> {
        let Some(record) = map.get(path) else {
            return Ok(());
        };
        let hash = self.compute_hash(map, record)?;
        if let Some(record) = map.get_mut(path) {
            record.hash = hash;
        }
        Ok(())
    }

    /// Rehash every record at or below `path`, deepest first.
    fn rehash_subtree(&self, map: &mut RecordMap, path: &NormalizedPath) -> Result<()> {
        let mut paths: Vec<NormalizedPath> = map
            .keys()
            .filter(|key| key.starts_with_dir(path))
            .cloned()
            .collect();
        paths.sort_by_key(|key| std::cmp::Reverse(key.segments().count()));
        for key in paths {
            self.rehash_one(map, &key)?;
        }
        Ok(())
    }

    /// Rehash `path` and each indexed ancestor, bottom-up.
    fn rehash_ancestors(&self, map: &mut RecordMap, path: &NormalizedPath) -> Result<()> {
        for dir in path.ancestors_inclusive().iter().rev() {
            self.rehash_one(map, dir)?;
        }
        Ok(())
    }

    /// Remove and return the records at or below `path`, ordered by path.
    fn take_subtree(map: &mut RecordMap, path: &NormalizedPath) -> Vec<FileRecord> {
        let keys: Vec<NormalizedPath> = map
            .keys()
            .filter(|key| key.starts_with_dir(path))
            .cloned()
            .collect();
        keys.iter().filter_map(|key| map.remove(key)).collect()
    }

    fn record_at(map: &RecordMap, path: &NormalizedPath) -> Result<FileRecord> {
        map.get(path).cloned().ok_or_else(|| Error::RecordNotFound {
            path: path.to_string(),
        })
    }
}

impl MetadataStore for FileIndex {
    fn should_be_synchronized(&self, path: &NormalizedPath) -> bool {
        self.policy.should_be_synchronized(self.files.as_ref(), path)
    }

    fn add_resource(&self, path: &NormalizedPath) -> Result<FileRecord> {
        if !self.should_be_synchronized(path) {
            return Err(Error::NotSynchronized {
                path: path.to_string(),
            });
        }

        let mut map = self.records.write();
        if let Some(existing) = map.get(path) {
            return Ok(existing.clone());
        }
        if !self.files.exists(path) {
            return Err(Error::ResourceNotFound {
                path: path.to_string(),
            });
        }

        let pid = self.ensure_parents(&mut map, path)?;
        self.insert_tree(&mut map, path, pid)?;
        self.rehash_subtree(&mut map, path)?;
        self.rehash_ancestors(&mut map, &path.dirname())?;
        tracing::debug!(path = %path, "added resource");

        Self::record_at(&map, path)
    }

    fn move_resource(&self, old: &NormalizedPath, new: &NormalizedPath) -> Result<FileRecord> {
        let mut map = self.records.write();
        if !map.contains_key(old) {
            drop(map);
            tracing::debug!(from = %old, to = %new, "source not indexed, registering target");
            return self.add_resource(new);
        }

        let pid = self.ensure_parents(&mut map, new)?;
        for mut record in Self::take_subtree(&mut map, old) {
            let Some(target) = record.path.rebase(old, new) else {
                continue;
            };
            if &record.path == old {
                record.pid = pid;
            }
            record.set_path(target.clone());
            map.insert(target, record);
        }

        self.rehash_ancestors(&mut map, &old.dirname())?;
        self.rehash_ancestors(&mut map, new)?;
        tracing::debug!(from = %old, to = %new, "moved resource");

        Self::record_at(&map, new)
    }

    fn copy_resource(&self, old: &NormalizedPath, new: &NormalizedPath) -> Result<FileRecord> {
        let mut map = self.records.write();
        if !map.contains_key(old) {
            drop(map);
            tracing::debug!(from = %old, to = %new, "source not indexed, registering target");
            return self.add_resource(new);
        }

        let pid = self.ensure_parents(&mut map, new)?;
        let sources: Vec<FileRecord> = map
            .values()
            .filter(|record| record.path.starts_with_dir(old))
            .cloned()
            .collect();

        // Sources are ordered by path, so every parent is remapped before its children
        let mut remapped: HashMap<Uuid, Uuid> = HashMap::new();
        for source in sources {
            let Some(target) = source.path.rebase(old, new) else {
                continue;
            };
            let mut copy = source.clone();
            copy.uuid = Uuid::new_v4();
            copy.pid = if &source.path == old {
                pid
            } else {
                source.pid.and_then(|parent| remapped.get(&parent).copied())
            };
            copy.set_path(target.clone());
            remapped.insert(source.uuid, copy.uuid);
            map.insert(target, copy);
        }

        self.rehash_ancestors(&mut map, new)?;
        tracing::debug!(from = %old, to = %new, "copied resource");

        Self::record_at(&map, new)
    }

    fn delete_resource(&self, path: &NormalizedPath) -> Result<Option<FileRecord>> {
        let mut map = self.records.write();
        let removed = Self::take_subtree(&mut map, path);
        if removed.is_empty() {
            return Ok(None);
        }

        self.rehash_ancestors(&mut map, &path.dirname())?;
        tracing::debug!(path = %path, records = removed.len(), "deleted resource");

        Ok(removed.into_iter().find(|record| &record.path == path))
    }

    fn delete_record(&self, path: &NormalizedPath) -> Result<Option<FileRecord>> {
        Ok(self.records.write().remove(path))
    }

    fn update_folder_hashes(&self, path: &NormalizedPath) -> Result<()> {
        let mut map = self.records.write();
        self.rehash_ancestors(&mut map, path)
    }

    fn find_by_path(&self, path: &NormalizedPath) -> Result<Option<FileRecord>> {
        Ok(self.records.read().get(path).cloned())
    }

    fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<FileRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .find(|record| record.uuid == uuid)
            .cloned())
    }

    fn find_under_prefix(&self, prefix: &str) -> Result<Option<Vec<FileRecord>>> {
        let matches: Vec<FileRecord> = self
            .records
            .read()
            .values()
            .filter(|record| record.path.as_str().starts_with(prefix))
            .cloned()
            .collect();
        Ok((!matches.is_empty()).then_some(matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repo_fs::LocalFiles;
    use std::fs;
    use tempfile::TempDir;

    fn index() -> (TempDir, FileIndex) {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("files")).unwrap();
        let files = Arc::new(LocalFiles::new(temp.path()).unwrap());
        (temp, FileIndex::new(files, SyncPolicy::default()))
    }

    #[test]
    fn add_resource_registers_parents_and_children() {
        let (temp, index) = index();
        fs::create_dir_all(temp.path().join("files/a/b")).unwrap();
        fs::write(temp.path().join("files/a/b/c.txt"), "c").unwrap();
        fs::write(temp.path().join("files/a/b/.hidden"), "h").unwrap();

        let record = index.add_resource(&"files/a/b".into()).unwrap();
        let parent = index.find_by_path(&"files/a".into()).unwrap().unwrap();
        let child = index.find_by_path(&"files/a/b/c.txt".into()).unwrap().unwrap();

        assert_eq!(record.pid, Some(parent.uuid));
        assert_eq!(parent.pid, None);
        assert_eq!(child.pid, Some(record.uuid));
        assert!(index.find_by_path(&"files/a/b/.hidden".into()).unwrap().is_none());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn add_resource_is_idempotent() {
        let (temp, index) = index();
        fs::create_dir_all(temp.path().join("files/a")).unwrap();

        let first = index.add_resource(&"files/a".into()).unwrap();
        let second = index.add_resource(&"files/a".into()).unwrap();
        assert_eq!(first.uuid, second.uuid);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn add_resource_outside_upload_dir_is_rejected() {
        let (temp, index) = index();
        fs::create_dir_all(temp.path().join("system")).unwrap();
        assert!(matches!(
            index.add_resource(&"system".into()),
            Err(Error::NotSynchronized { .. })
        ));
    }

    #[test]
    fn folder_hash_follows_child_content() {
        let (temp, index) = index();
        fs::create_dir_all(temp.path().join("files/a")).unwrap();
        fs::write(temp.path().join("files/a/x.txt"), "one").unwrap();
        let before = index.add_resource(&"files/a".into()).unwrap().hash;

        fs::write(temp.path().join("files/a/x.txt"), "two").unwrap();
        index.update_folder_hashes(&"files/a/x.txt".into()).unwrap();
        let after = index.find_by_path(&"files/a".into()).unwrap().unwrap().hash;

        assert!(before.starts_with("sha256:"));
        assert_ne!(before, after);
    }

    #[test]
    fn find_under_prefix_returns_none_when_empty() {
        let (_temp, index) = index();
        assert!(index.find_under_prefix("files/").unwrap().is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let (temp, index) = index();
        fs::create_dir_all(temp.path().join("files/a")).unwrap();
        fs::write(temp.path().join("files/a/x.txt"), "x").unwrap();
        index.add_resource(&"files/a".into()).unwrap();

        let path = temp.path().join("index.toml");
        index.save(&path).unwrap();
        let entries: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(entries.iter().all(|name| !name.ends_with(".tmp")), "{entries:?}");

        let files = Arc::new(LocalFiles::new(temp.path()).unwrap());
        let loaded = FileIndex::load(files, SyncPolicy::default(), &path).unwrap();
        assert_eq!(loaded.records(), index.records());
    }

    #[test]
    fn load_rejects_unknown_version() {
        let (temp, _index) = index();
        let path = temp.path().join("index.toml");
        fs::write(&path, "version = \"9.9\"\n").unwrap();

        let files = Arc::new(LocalFiles::new(temp.path()).unwrap());
        assert!(matches!(
            FileIndex::load(files, SyncPolicy::default(), &path),
            Err(Error::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn failed_save_leaves_no_temp_file() {
        let (temp, index) = index();
        let target = temp.path().join("index.toml");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "").unwrap();

        assert!(index.save(&target).is_err());

        let mut entries: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        assert_eq!(entries, vec!["files", "index.toml"]);
    }
}
