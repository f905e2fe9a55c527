use pretty_assertions::assert_eq;
use repo_fs::{ConfigStore, Error, NormalizedPath};
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
struct TestConfig {
    upload_path: String,
    exclude: Vec<String>,
}

fn sample() -> TestConfig {
    TestConfig {
        upload_path: "files".into(),
        exclude: vec!["tmp".into()],
    }
}

#[test]
fn load_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sync.toml");
    fs::write(&path, "upload_path = \"files\"\nexclude = [\"tmp\"]\n").unwrap();

    let config: TestConfig = ConfigStore::new().load(&NormalizedPath::new(&path)).unwrap();
    assert_eq!(config, sample());
}

#[test]
fn load_yaml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sync.yml");
    fs::write(&path, "upload_path: files\nexclude:\n  - tmp\n").unwrap();

    let config: TestConfig = ConfigStore::new().load(&NormalizedPath::new(&path)).unwrap();
    assert_eq!(config, sample());
}

#[test]
fn save_then_load_json() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("sync.json"));
    let store = ConfigStore::new();

    store.save(&path, &sample()).unwrap();
    let loaded: TestConfig = store.load(&path).unwrap();
    assert_eq!(loaded, sample());
}

#[test]
fn load_or_default_on_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent.toml"));
    let config: TestConfig = ConfigStore::new().load_or_default(&path).unwrap();
    assert_eq!(config, TestConfig::default());
}

#[test]
fn malformed_toml_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sync.toml");
    fs::write(&path, "upload_path = [").unwrap();

    let result: Result<TestConfig, _> = ConfigStore::new().load(&NormalizedPath::new(&path));
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
fn unknown_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sync.ini");
    fs::write(&path, "").unwrap();

    let result: Result<TestConfig, _> = ConfigStore::new().load(&NormalizedPath::new(&path));
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}
