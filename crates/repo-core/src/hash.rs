//! Structural fingerprint of a folder
//!
//! The fingerprint covers entry names and nesting only, never file contents:
//! two trees with the same relative entry paths hash the same.

use std::path::Path;

use repo_fs::checksum::compute_joined_checksum;
use repo_fs::constants::is_hidden;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Separator between relative entry paths in the digest input
const DELIMITER: &str = "-";

/// Relative paths of every visible entry below `dir`, parents before children.
///
/// Symbolic links are followed. Entries are visited in file-name order within
/// each directory so the sequence does not depend on the platform's listing
/// order. Only the entry's own name is checked for a leading dot: the
/// children of a hidden directory are still listed.
pub fn entry_paths(dir: &Path) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if is_hidden(&entry.file_name().to_string_lossy()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            paths.push(portable(relative));
        }
    }
    Ok(paths)
}

/// Relative path with `/` separators; backslash is only a separator on windows.
#[cfg(windows)]
fn portable(relative: &Path) -> String {
    relative.to_string_lossy().replace('\\', "/")
}

#[cfg(not(windows))]
fn portable(relative: &Path) -> String {
    relative.to_string_lossy().into_owned()
}

/// Fingerprint of the folder at `dir` in canonical `sha256:<hex>` form.
pub fn structural_hash(dir: &Path) -> Result<String> {
    let paths = entry_paths(dir)?;
    tracing::trace!(dir = %dir.display(), entries = paths.len(), "hashed folder structure");
    Ok(compute_joined_checksum(&paths, DELIMITER))
}
