use bytes::Bytes;
use thiserror::Error;

use super::{RawStore, StorageError, UploadMetadata};
use crate::formats::{FormatError, FormatRegistry, JsonHandler, format_id_for_path};
use crate::value::Value;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("'{0}' has no extension to select a format")]
    MissingExtension(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of [`write_document`]
#[derive(Debug, Clone)]
pub struct WriteReceipt {
    pub upload: UploadMetadata,
    pub content_type: mime::Mime,
}

fn format_id(key: &str) -> Result<&str, DocumentError> {
    format_id_for_path(key).ok_or_else(|| DocumentError::MissingExtension(key.to_string()))
}

/// Fetch `key` and run it through the inbound transform of its format
pub async fn read_document(
    store: &dyn RawStore,
    registry: &FormatRegistry,
    key: &str,
) -> Result<Value, DocumentError> {
    let format_id = format_id(key)?;
    // Unsupported formats fail before any I/O
    registry.get(format_id)?;

    let raw = store.fetch(key).await?;
    Ok(registry.inbound(&Value::Bytes(raw), format_id)?)
}

/// Run `value` through the outbound transform of the key's format and
/// store the result
///
/// Text and bytes are stored as they are. Structured results, such as the
/// record returned for a remote document, are stored as JSON.
pub async fn write_document(
    store: &dyn RawStore,
    registry: &FormatRegistry,
    key: &str,
    value: &Value,
) -> Result<WriteReceipt, DocumentError> {
    let format_id = format_id(key)?;
    let content_type = registry.get(format_id)?.content_type();

    let data = match registry.outbound(value, format_id)? {
        Value::String(s) => Bytes::from(s),
        Value::Bytes(b) => b,
        structured => Bytes::from(JsonHandler::new().to_text(&structured)?),
    };

    let upload = store.persist(key, data).await?;
    Ok(WriteReceipt {
        upload,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{FormatHandler, TextHandler};
    use crate::storage::StorageClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_write_then_read_json() {
        let storage = StorageClient::in_memory();
        let registry = FormatRegistry::with_defaults();
        let value: Value = [("Key", "Value")].into_iter().collect();

        let receipt = write_document(&storage, &registry, "props.json", &value)
            .await
            .unwrap();
        assert_eq!(receipt.content_type, mime::APPLICATION_JSON);
        assert_eq!(receipt.upload.size, "{\n    \"Key\": \"Value\"\n}".len());

        let read = read_document(&storage, &registry, "props.json").await.unwrap();
        assert_eq!(read, value);
    }

    #[tokio::test]
    async fn test_read_ini() {
        let storage = StorageClient::in_memory();
        let registry = FormatRegistry::with_defaults();
        storage
            .persist("render.ini", Bytes::from_static(b"[A]\nKey=val\n"))
            .await
            .unwrap();

        let read = read_document(&storage, &registry, "render.ini").await.unwrap();
        assert_eq!(
            read.get("A").and_then(|a| a.get("Key")),
            Some(&Value::from("val"))
        );
    }

    #[tokio::test]
    async fn test_key_errors() {
        let storage = StorageClient::in_memory();
        let registry = FormatRegistry::with_defaults();

        let err = read_document(&storage, &registry, "README").await.unwrap_err();
        assert!(matches!(err, DocumentError::MissingExtension(_)));

        // Unsupported format is reported even though the key does not exist
        let err = read_document(&storage, &registry, "a.xyz").await.unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Format(FormatError::UnsupportedFormat(_))
        ));

        let err = read_document(&storage, &registry, "a.txt").await.unwrap_err();
        assert!(matches!(err, DocumentError::Storage(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_transform_writes_nothing() {
        let storage = StorageClient::in_memory();
        let registry = FormatRegistry::with_defaults();

        let err = write_document(&storage, &registry, "a.ini", &Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Format(FormatError::NotImplemented { .. })
        ));
        assert!(!storage.exists("a.ini").await.unwrap());
    }

    /// Returns its input untouched, like a descriptor record
    struct Passthrough;

    impl FormatHandler for Passthrough {
        fn name(&self) -> &'static str {
            "passthrough"
        }

        fn content_type(&self) -> mime::Mime {
            mime::APPLICATION_JSON
        }

        fn outbound(&self, value: &Value) -> Result<Value, FormatError> {
            Ok(value.clone())
        }

        fn inbound(&self, raw: &Value) -> Result<Value, FormatError> {
            TextHandler::new().inbound(raw)
        }
    }

    fn passthrough_registry() -> FormatRegistry {
        let mut registry = FormatRegistry::new();
        registry.register(".rec", Arc::new(Passthrough));
        registry
    }

    #[tokio::test]
    async fn test_structured_result_stored_as_json() {
        let storage = StorageClient::in_memory();
        let registry = passthrough_registry();

        let record: Value = [("link", "https://docs/1"), ("resource_id", "document:1")]
            .into_iter()
            .collect();
        write_document(&storage, &registry, "a.rec", &record).await.unwrap();

        let stored = storage.fetch("a.rec").await.unwrap();
        let expected =
            "{\n    \"link\": \"https://docs/1\",\n    \"resource_id\": \"document:1\"\n}";
        assert_eq!(stored, Bytes::from(expected));
    }

    #[tokio::test]
    async fn test_unencodable_structured_result_writes_nothing() {
        let storage = StorageClient::in_memory();
        let registry = passthrough_registry();

        let record: Value = [("data", Value::Bytes(Bytes::from_static(b"\x00")))]
            .into_iter()
            .collect();
        let err = write_document(&storage, &registry, "a.rec", &record)
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentError::Format(FormatError::DataCorrupted { .. })));
        assert!(!storage.exists("a.rec").await.unwrap());
    }
}
