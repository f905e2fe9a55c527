//! Public-access marker handling
//!
//! A folder is public while it holds a `.public` marker file and protected
//! otherwise.

use repo_fs::{ContentPath, FileHandles, NormalizedPath};

use crate::Result;

fn marker(folder: &NormalizedPath) -> NormalizedPath {
    folder.join(ContentPath::PublicMarker.as_str())
}

pub fn is_protected(files: &dyn FileHandles, folder: &NormalizedPath) -> bool {
    !files.exists(&marker(folder))
}

/// Remove the marker. Returns `false` when it was already absent.
pub fn protect(files: &dyn FileHandles, folder: &NormalizedPath) -> Result<bool> {
    let marker = marker(folder);
    if !files.exists(&marker) {
        return Ok(false);
    }
    files.delete_file(&marker)?;
    tracing::debug!(folder = %folder, "folder protected");
    Ok(true)
}

/// Create an empty marker. Returns `false` when it was already present.
pub fn unprotect(files: &dyn FileHandles, folder: &NormalizedPath) -> Result<bool> {
    let marker = marker(folder);
    if files.exists(&marker) {
        return Ok(false);
    }
    files.create_file(&marker, b"")?;
    tracing::debug!(folder = %folder, "folder unprotected");
    Ok(true)
}
