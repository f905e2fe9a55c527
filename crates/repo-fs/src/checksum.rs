//! SHA-256 checksum utilities
//!
//! Every digest in the repository uses the canonical `sha256:<hex>` format,
//! whether it fingerprints a folder's structure or a file's bytes.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of string content.
pub fn compute_content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the checksum of `parts` joined by `delimiter`.
///
/// Equivalent to joining into one string first, without the allocation.
pub fn compute_joined_checksum<I, S>(parts: I, delimiter: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for (idx, part) in parts.into_iter().enumerate() {
        if idx > 0 {
            hasher.update(delimiter.as_bytes());
        }
        hasher.update(part.as_ref().as_bytes());
    }
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}
