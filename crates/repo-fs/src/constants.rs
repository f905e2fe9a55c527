//! Well-known names inside the content tree.

use std::path::Path;

/// Marker files and directories with special meaning to the content repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPath {
    /// `.public`: a folder carrying this file is exempt from access protection
    PublicMarker,
    /// `.nosync`: a folder carrying this file is left out of the metadata index
    NoSyncMarker,
    /// `files`: default upload directory mirrored into the metadata index
    UploadDir,
}

impl ContentPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicMarker => ".public",
            Self::NoSyncMarker => ".nosync",
            Self::UploadDir => "files",
        }
    }
}

impl AsRef<Path> for ContentPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ContentPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ContentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// True for dot-prefixed names, which the hash and size walks skip.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
