//! Storage + registry integration against a local directory

use formatbox::config::Config;
use formatbox::formats::{FormatError, FormatRegistry};
use formatbox::storage::{DocumentError, RawStore, StorageClient, read_document, write_document};
use formatbox::value::Value;
use std::fs;
use tempfile::TempDir;

/// Config file pointing storage at `root`, with a `.cfg` alias and a
/// two-space JSON indent
fn setup() -> (TempDir, Config) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().join("store");
    fs::create_dir(&root).unwrap();

    let config_path = temp_dir.path().join("formatbox.toml");
    let toml_content = format!(
        r#"
[formats.json]
indent = 2

[[formats.aliases]]
id = ".cfg"
target = ".ini"

[storage]
provider = "local"
root = {root:?}
        "#,
        root = root.display().to_string()
    );
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from_path(config_path).expect("Failed to load test config");
    (temp_dir, config)
}

#[tokio::test]
async fn test_json_document_on_disk() {
    let (temp_dir, config) = setup();
    let registry = FormatRegistry::from_config(&config.formats);
    let storage = StorageClient::from_config(&config.storage).unwrap();

    let value: Value = [("Key", "Value")].into_iter().collect();
    let receipt = write_document(&storage, &registry, "chan4.kvs/properties.json", &value)
        .await
        .unwrap();
    assert_eq!(receipt.content_type, mime::APPLICATION_JSON);

    let on_disk = fs::read_to_string(
        temp_dir
            .path()
            .join("store")
            .join("chan4.kvs")
            .join("properties.json"),
    )
    .unwrap();
    assert_eq!(on_disk, "{\n  \"Key\": \"Value\"\n}");

    let read = read_document(&storage, &registry, "chan4.kvs/properties.json")
        .await
        .unwrap();
    assert_eq!(read, value);
}

#[tokio::test]
async fn test_alias_reads_section_config() {
    let (temp_dir, config) = setup();
    let registry = FormatRegistry::from_config(&config.formats);
    let storage = StorageClient::from_config(&config.storage).unwrap();

    fs::write(
        temp_dir.path().join("store").join("render.cfg"),
        "[Render]\nQuality = high\n",
    )
    .unwrap();

    let read = read_document(&storage, &registry, "render.cfg").await.unwrap();
    assert_eq!(
        read.get("Render").and_then(|r| r.get("Quality")),
        Some(&Value::from("high"))
    );
}

#[tokio::test]
async fn test_malformed_document_surfaces() {
    let (temp_dir, config) = setup();
    let registry = FormatRegistry::from_config(&config.formats);
    let storage = StorageClient::from_config(&config.storage).unwrap();

    fs::write(temp_dir.path().join("store").join("broken.json"), "{not valid").unwrap();

    let err = read_document(&storage, &registry, "broken.json").await.unwrap_err();
    assert!(matches!(
        err,
        DocumentError::Format(FormatError::MalformedInput { .. })
    ));
}

#[tokio::test]
async fn test_text_document_round_trip() {
    let (_temp_dir, config) = setup();
    let registry = FormatRegistry::from_config(&config.formats);
    let storage = StorageClient::from_config(&config.storage).unwrap();

    write_document(&storage, &registry, "notes.txt", &Value::from("shot 0010 approved"))
        .await
        .unwrap();

    let raw = storage.fetch("notes.txt").await.unwrap();
    assert_eq!(&raw[..], b"shot 0010 approved");

    let read = read_document(&storage, &registry, "notes.txt").await.unwrap();
    assert_eq!(read, Value::from("shot 0010 approved"));
}
