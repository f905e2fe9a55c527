//! Normalized path handling for root-relative content paths

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Content paths are stored relative to the repository root, with the empty
/// string standing for the root itself. The same type is used for the
/// absolute root directory, which is only converted to a platform-native
/// path at I/O boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and drops trailing slashes
    /// (a lone `/` is kept as-is).
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        let trimmed = normalized.trim_end_matches('/');
        let inner = if trimmed.is_empty() && normalized.starts_with('/') {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        Self { inner }
    }

    /// The repository root (empty path).
    pub fn root() -> Self {
        Self::default()
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// True for the empty root path.
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// Joining onto the root yields the segment itself, and joining an empty
    /// segment is a no-op.
    pub fn join(&self, segment: &str) -> Self {
        let segment = Self::new(segment.trim_start_matches(['/', '\\']));
        if segment.is_root() {
            return self.clone();
        }
        if self.is_root() {
            return segment;
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment.inner)
        } else {
            format!("{}/{}", self.inner, segment.inner)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    ///
    /// Returns `None` for single-segment and empty paths; see [`dirname`]
    /// for the root-relative variant.
    ///
    /// [`dirname`]: NormalizedPath::dirname
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Parent directory of a root-relative path, the root for top-level entries.
    pub fn dirname(&self) -> Self {
        self.parent().unwrap_or_default()
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Non-empty path segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// Every accumulated prefix of this path, shortest first.
    ///
    /// `a/b/c` yields `a`, `a/b`, `a/b/c`. The root yields nothing.
    pub fn ancestors_inclusive(&self) -> Vec<Self> {
        let mut current = Self::root();
        self.segments()
            .map(|segment| {
                current = current.join(segment);
                current.clone()
            })
            .collect()
    }

    /// True if this path equals `dir` or lies beneath it.
    ///
    /// Every path lies beneath the root.
    pub fn starts_with_dir(&self, dir: &NormalizedPath) -> bool {
        if dir.is_root() {
            return true;
        }
        self.inner == dir.inner
            || (self.inner.starts_with(&dir.inner)
                && self.inner.as_bytes().get(dir.inner.len()) == Some(&b'/'))
    }

    /// Replace the leading `from` directory with `to`.
    ///
    /// Returns `None` if this path does not lie beneath `from`.
    pub fn rebase(&self, from: &NormalizedPath, to: &NormalizedPath) -> Option<Self> {
        if !self.starts_with_dir(from) {
            return None;
        }
        let rest = if from.is_root() {
            self.inner.as_str()
        } else {
            &self.inner[from.inner.len()..]
        };
        Some(to.join(rest))
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for NormalizedPath {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl From<&NormalizedPath> for NormalizedPath {
    fn from(p: &NormalizedPath) -> Self {
        p.clone()
    }
}

impl serde::Serialize for NormalizedPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner)
    }
}

impl<'de> serde::Deserialize<'de> for NormalizedPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}
