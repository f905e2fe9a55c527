//! Local-disk implementation of the filesystem collaborators

use crate::constants::is_hidden;
use crate::{Error, FileHandles, FileOps, NormalizedPath, Result, io};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem primitives rooted at a repository directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalFiles {
    root: NormalizedPath,
}

impl LocalFiles {
    /// Bind to an existing repository root directory.
    ///
    /// The root is canonicalized once so later joins never depend on the
    /// process working directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = dunce::canonicalize(root).map_err(|e| Error::io(root, e))?;
        if !canonical.is_dir() {
            return Err(Error::InvalidRoot { path: canonical });
        }
        Ok(Self {
            root: NormalizedPath::new(canonical),
        })
    }

    /// The absolute repository root.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn native(&self, path: &NormalizedPath) -> PathBuf {
        self.root.join(path.as_str()).to_native()
    }
}

fn copy_recursive(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).map_err(|e| Error::io(to, e))?;
    for entry in fs::read_dir(from).map_err(|e| Error::io(from, e))? {
        let entry = entry.map_err(|e| Error::io(from, e))?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        if source.is_dir() {
            copy_recursive(&source, &target)?;
        } else {
            fs::copy(&source, &target).map_err(|e| Error::io(&source, e))?;
        }
    }
    Ok(())
}

impl FileOps for LocalFiles {
    fn mkdir(&self, path: &NormalizedPath) -> Result<()> {
        let native = self.native(path);
        match fs::create_dir(&native) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && native.is_dir() => Ok(()),
            Err(e) => Err(Error::io(native, e)),
        }
    }

    fn remove_tree(&self, path: &NormalizedPath, keep_root: bool) -> Result<()> {
        let native = self.native(path);
        if !keep_root {
            return fs::remove_dir_all(&native).map_err(|e| Error::io(native, e));
        }

        for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
            let entry = entry.map_err(|e| Error::io(&native, e))?;
            let entry_path = entry.path();
            // Symlinks are unlinked, never followed
            let file_type = entry.file_type().map_err(|e| Error::io(&entry_path, e))?;
            let removed = if file_type.is_dir() {
                fs::remove_dir_all(&entry_path)
            } else {
                fs::remove_file(&entry_path)
            };
            removed.map_err(|e| Error::io(&entry_path, e))?;
        }
        Ok(())
    }

    fn rename(&self, old: &NormalizedPath, new: &NormalizedPath) -> bool {
        let from = self.native(old);
        let to = self.native(new);
        if to.exists() {
            tracing::warn!(from = %old, to = %new, "rename target already exists");
            return false;
        }
        match fs::rename(&from, &to) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(from = %old, to = %new, error = %e, "rename failed");
                false
            }
        }
    }

    fn copy_tree(&self, old: &NormalizedPath, new: &NormalizedPath) -> Result<()> {
        let from = self.native(old);
        let to = self.native(new);
        if from.is_file() {
            fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
            return Ok(());
        }
        copy_recursive(&from, &to)
    }

    #[cfg(unix)]
    fn chmod(&self, path: &NormalizedPath, mode: u32) -> bool {
        use std::os::unix::fs::PermissionsExt;

        let native = self.native(path);
        match fs::set_permissions(&native, fs::Permissions::from_mode(mode)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path, mode = %format!("{mode:o}"), error = %e, "chmod failed");
                false
            }
        }
    }

    #[cfg(not(unix))]
    fn chmod(&self, path: &NormalizedPath, mode: u32) -> bool {
        tracing::warn!(path = %path, mode = %format!("{mode:o}"), "chmod is not supported on this platform");
        false
    }
}

impl FileHandles for LocalFiles {
    fn create_file(&self, path: &NormalizedPath, content: &[u8]) -> Result<()> {
        io::write_atomic(&self.root.join(path.as_str()), content)
    }

    fn delete_file(&self, path: &NormalizedPath) -> Result<()> {
        let native = self.native(path);
        fs::remove_file(&native).map_err(|e| Error::io(native, e))
    }

    fn file_size(&self, path: &NormalizedPath) -> Result<u64> {
        let native = self.native(path);
        fs::metadata(&native)
            .map(|meta| meta.len())
            .map_err(|e| Error::io(native, e))
    }

    fn exists(&self, path: &NormalizedPath) -> bool {
        self.native(path).exists()
    }

    fn is_dir(&self, path: &NormalizedPath) -> bool {
        self.native(path).is_dir()
    }

    fn is_file(&self, path: &NormalizedPath) -> bool {
        self.native(path).is_file()
    }

    fn list(&self, path: &NormalizedPath, include_hidden: bool) -> Result<Vec<String>> {
        let native = self.native(path);
        let mut names = Vec::new();
        for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
            let entry = entry.map_err(|e| Error::io(&native, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if include_hidden || !is_hidden(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn absolute(&self, path: &NormalizedPath) -> PathBuf {
        self.native(path)
    }
}
