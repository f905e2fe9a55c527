//! Scenario tests for managed folders
//!
//! Each module walks one end-to-end scenario against a real temporary
//! content root and a fresh in-memory index.

use repo_core::{Folder, FolderContext};
use repo_meta::SyncPolicy;
use repo_test_utils::content::TestContentRoot;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Content root plus a context whose policy synchronizes `upload_path`.
struct Scenario {
    root: TestContentRoot,
    ctx: FolderContext,
}

impl Scenario {
    fn new() -> Self {
        Self::with_policy(SyncPolicy::default())
    }

    /// Every path below the root is synchronized.
    fn whole_tree() -> Self {
        Self::with_policy(SyncPolicy::with_upload_path(""))
    }

    fn with_policy(policy: SyncPolicy) -> Self {
        let root = TestContentRoot::new();
        let ctx = FolderContext::local(root.root(), policy).unwrap();
        Self { root, ctx }
    }

    fn open(&self, path: &str) -> Folder {
        Folder::open(&self.ctx, path).unwrap()
    }
}

// =============================================================================
// Scenario 1: Nested construction
// =============================================================================

mod s1_construct {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn nested_path_creates_all_segments() {
        let s = Scenario::new();

        let folder = s.open("a/b/c");

        let is_dir = predicate::path::is_dir();
        for segment in ["a", "a/b", "a/b/c"] {
            assert!(is_dir.eval(&s.root.abs(segment)), "{segment} should exist");
        }
        assert!(folder.is_empty().unwrap());
    }

    #[test]
    fn plain_file_is_rejected() {
        let s = Scenario::new();
        s.root.write("a/b", "not a folder");

        let err = Folder::open(&s.ctx, "a/b").unwrap_err();

        assert_eq!(err.to_string(), "File \"a/b\" is not a directory");
    }
}

// =============================================================================
// Scenario 2: Recursive size
// =============================================================================

mod s2_size {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn size_spans_subfolders() {
        let s = Scenario::new();
        s.root.write_bytes("x/ten.bin", 10);
        s.root.write_bytes("x/twenty.bin", 20);
        s.root.write_bytes("x/y/five.bin", 5);

        assert_eq!(s.open("x").size().unwrap(), 35);
        assert_eq!(s.open("x/y").size().unwrap(), 5);
    }

    #[test]
    fn size_follows_changes() {
        let s = Scenario::new();
        s.root.write_bytes("x/a.bin", 10);
        let folder = s.open("x");
        assert_eq!(folder.size().unwrap(), 10);

        s.root.write_bytes("x/b.bin", 4);

        assert_eq!(folder.size().unwrap(), 14);
    }
}

// =============================================================================
// Scenario 3: Rename inside the synchronized tree
// =============================================================================

mod s3_rename {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_follows_the_folder() {
        let s = Scenario::whole_tree();
        s.root.write("x/doc.txt", "content");
        let original = s.ctx.store().add_resource(&"x".into()).unwrap();
        let mut folder = s.open("x");

        assert!(folder.rename_to("y").unwrap());

        let store = s.ctx.store();
        assert!(store.find_by_path(&"x".into()).unwrap().is_none());
        let moved = store.find_by_path(&"y".into()).unwrap().unwrap();
        assert_eq!(moved.uuid, original.uuid);
        assert_eq!(moved.name, "y");
        assert_eq!(folder.path().as_str(), "y");
        s.root.assert_file_exists("y/doc.txt");
        s.root.assert_not_exists("x");
    }

    #[test]
    fn renamed_handle_reports_new_hash() {
        let s = Scenario::whole_tree();
        s.root.write("x/doc.txt", "content");
        let mut folder = s.open("x");
        let before = folder.hash().unwrap();

        folder.rename_to("y").unwrap();

        // Entry paths are relative to the folder, so the fingerprint is unchanged
        assert_eq!(folder.hash().unwrap(), before);
    }
}

// =============================================================================
// Scenario 4: Publishing markers
// =============================================================================

mod s4_markers {
    use super::*;

    #[test]
    fn repeated_unprotect_keeps_single_marker() {
        let s = Scenario::new();
        let folder = s.open("files/public");

        folder.unprotect().unwrap();
        folder.unprotect().unwrap();

        let markers = std::fs::read_dir(s.root.abs("files/public"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name() == ".public")
            .count();
        assert_eq!(markers, 1);
    }

    #[test]
    fn protect_after_unprotect_removes_marker() {
        let s = Scenario::new();
        let folder = s.open("files/public");

        folder.unprotect().unwrap();
        folder.protect().unwrap();
        folder.protect().unwrap();

        s.root.assert_not_exists("files/public/.public");
        assert!(folder.is_protected());
    }
}
