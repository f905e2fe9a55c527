//! Root-relative path resolution

use crate::{Error, Result};
use repo_fs::NormalizedPath;
use std::path::PathBuf;

/// Joins the repository root with root-relative folder paths.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: NormalizedPath,
}

impl PathResolver {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    /// The absolute repository root.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Normalize a root-relative path; `.` is an alias of the root.
    pub fn normalize(&self, path: impl Into<NormalizedPath>) -> NormalizedPath {
        let path = path.into();
        let trimmed = path.as_str().trim_start_matches("./");
        if trimmed == "." || trimmed == "/" {
            NormalizedPath::root()
        } else {
            NormalizedPath::new(trimmed)
        }
    }

    /// Native absolute location of a root-relative path.
    pub fn absolute(&self, path: &NormalizedPath) -> PathBuf {
        self.root.join(path.as_str()).to_native()
    }

    /// Normalize `path` and make sure it does not name a plain file.
    pub fn resolve(&self, path: impl Into<NormalizedPath>) -> Result<NormalizedPath> {
        let path = self.normalize(path);
        if self.absolute(&path).is_file() {
            return Err(Error::NotADirectory {
                path: path.to_string(),
            });
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(".", "")]
    #[case("./", "")]
    #[case("", "")]
    #[case("./files/a", "files/a")]
    #[case("files\\a\\", "files/a")]
    fn normalize_handles_root_aliases(#[case] input: &str, #[case] expected: &str) {
        let resolver = PathResolver::new("/srv/content");
        assert_eq!(resolver.normalize(input).as_str(), expected);
    }

    #[test]
    fn absolute_of_root_is_root() {
        let resolver = PathResolver::new("/srv/content");
        assert_eq!(
            resolver.absolute(&NormalizedPath::root()),
            PathBuf::from("/srv/content")
        );
    }

    #[test]
    fn resolve_rejects_plain_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("readme.txt"), "x").unwrap();
        let resolver = PathResolver::new(temp.path());

        assert!(matches!(
            resolver.resolve("readme.txt"),
            Err(Error::NotADirectory { .. })
        ));
        assert_eq!(resolver.resolve("missing/dir").unwrap().as_str(), "missing/dir");
    }
}
