//! End-to-end integration test for folder handles backed by a persisted index
//!
//! Exercises the complete flow: policy loading -> folder operations -> index
//! save -> reload -> further operations against the reloaded index.

use pretty_assertions::assert_eq;
use repo_core::{Folder, FolderContext};
use repo_fs::{LocalFiles, NormalizedPath};
use repo_meta::{FileIndex, MetadataStore, SyncPolicy};
use repo_test_utils::content::TestContentRoot;
use std::fs;
use std::sync::Arc;

/// Content root with a policy file excluding `files/cache`.
fn setup_content_root() -> TestContentRoot {
    let root = TestContentRoot::new();
    root.write(
        ".repository/sync.toml",
        r#"
upload_path = "files"
exclude = ["cache"]
nosync_marker = ".nosync"
"#,
    );
    root
}

fn load_policy(root: &TestContentRoot) -> SyncPolicy {
    SyncPolicy::load(&NormalizedPath::new(root.abs(".repository/sync.toml"))).unwrap()
}

#[test]
fn test_policy_loaded_from_config() {
    let root = setup_content_root();
    let policy = load_policy(&root);

    assert_eq!(policy.upload_path.as_str(), "files");
    assert_eq!(policy.exclude, vec![NormalizedPath::new("cache")]);

    let ctx = FolderContext::local(root.root(), policy).unwrap();
    assert!(Folder::open(&ctx, "files/docs").unwrap().is_synchronized());
    assert!(!Folder::open(&ctx, "files/cache/thumbs").unwrap().is_synchronized());
    assert!(!Folder::open(&ctx, "assets").unwrap().is_synchronized());
}

#[test]
fn test_missing_policy_file_uses_defaults() {
    let root = TestContentRoot::new();
    let policy = SyncPolicy::load(&NormalizedPath::new(root.abs("absent.toml"))).unwrap();
    assert_eq!(policy, SyncPolicy::default());
}

#[test]
fn test_index_survives_save_and_reload() {
    let root = setup_content_root();
    let index_path = root.abs(".repository/index.toml");

    let files = Arc::new(LocalFiles::new(root.root()).unwrap());
    let index = Arc::new(FileIndex::new(files.clone(), load_policy(&root)));
    let ctx = FolderContext::with_index(files.clone(), index.clone());

    let mut folder = Folder::open(&ctx, "files/projects/alpha").unwrap();
    root.write("files/projects/alpha/notes.txt", "first draft");
    ctx.sync().refresh_hash(folder.path()).unwrap();
    ctx.store().add_resource(&"files/projects/alpha/notes.txt".into()).unwrap();
    let uuid = folder.model().unwrap().unwrap().uuid;

    index.save(&index_path).unwrap();
    assert!(fs::read_to_string(&index_path).unwrap().contains("files/projects/alpha"));

    let reloaded = Arc::new(FileIndex::load(files.clone(), load_policy(&root), &index_path).unwrap());
    assert_eq!(reloaded.len(), index.len());

    let ctx = FolderContext::with_index(files, reloaded.clone());
    let mut folder = Folder::open(&ctx, "files/projects/alpha").unwrap();
    assert_eq!(folder.model().unwrap().map(|record| record.uuid), Some(uuid));

    assert!(folder.rename_to("files/projects/beta").unwrap());
    let moved = reloaded.find_by_path(&"files/projects/beta".into()).unwrap().unwrap();
    assert_eq!(moved.uuid, uuid);
    assert!(
        reloaded
            .find_by_path(&"files/projects/beta/notes.txt".into())
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_corrupt_index_is_reported() {
    let root = setup_content_root();
    let index_path = root.abs(".repository/index.toml");
    fs::write(&index_path, "this is not = [valid").unwrap();

    let files = Arc::new(LocalFiles::new(root.root()).unwrap());
    let result = FileIndex::load(files, SyncPolicy::default(), &index_path);

    assert!(result.is_err());
}

#[test]
fn test_full_lifecycle() {
    let root = setup_content_root();
    let ctx = FolderContext::local(root.root(), load_policy(&root)).unwrap();

    // Create and populate
    let mut folder = Folder::open(&ctx, "files/gallery").unwrap();
    root.write_bytes("files/gallery/a.jpg", 100);
    root.write_bytes("files/gallery/2024/b.jpg", 50);
    ctx.store().add_resource(&"files/gallery/a.jpg".into()).unwrap();
    ctx.store().add_resource(&"files/gallery/2024".into()).unwrap();
    assert_eq!(folder.size().unwrap(), 150);

    // Publish
    folder.unprotect().unwrap();
    assert!(!folder.is_protected());
    assert_eq!(folder.size().unwrap(), 150);

    // Copy keeps the original in place
    assert!(folder.copy_to("files/gallery-copy").unwrap());
    let copy = Folder::open(&ctx, "files/gallery-copy").unwrap();
    assert_eq!(copy.hash().unwrap(), folder.hash().unwrap());
    assert!(!copy.is_protected());

    // Purge then delete
    folder.purge().unwrap();
    assert!(folder.is_empty().unwrap());
    assert!(ctx.store().find_under_prefix("files/gallery/").unwrap().is_none());
    assert!(
        ctx.store()
            .find_by_path(&"files/gallery-copy/2024/b.jpg".into())
            .unwrap()
            .is_some()
    );

    folder.delete().unwrap();
    root.assert_not_exists("files/gallery");
    assert!(ctx.store().find_by_path(&"files/gallery".into()).unwrap().is_none());
}
