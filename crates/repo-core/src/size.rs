//! Recursive folder size

use std::path::Path;

use repo_fs::constants::is_hidden;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Total byte size of the visible files below `dir`.
///
/// Dot-prefixed entries are skipped together with everything beneath them.
/// Entries are taken from the native listing, so names that are not valid
/// root-relative path segments (a backslash on unix, non-UTF-8 bytes) are
/// still measured. Symbolic links are followed. Nothing is memoized, so every
/// call walks the whole subtree.
pub fn folder_size(dir: &Path) -> Result<u64> {
    let walk_error = |source| Error::Walk {
        path: dir.to_path_buf(),
        source,
    };
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_hidden(&entry.file_name().to_string_lossy()));

    let mut total = 0;
    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(walk_error)?.len();
        }
    }
    Ok(total)
}
