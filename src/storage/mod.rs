//! Storage collaborator for raw documents
//! Uses Apache Arrow object_store crate

mod documents;

pub use documents::{DocumentError, WriteReceipt, read_document, write_document};

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{ObjectStore, local::LocalFileSystem, path::Path as StoragePath};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageConfig, StorageProvider};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Metadata returned after upload
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub key: String,
    pub etag: Option<String>,
    pub size: usize,
}

/// Where raw documents come from and go to
///
/// The transcoding layer only ever sees bytes; opening, closing and
/// layout are the store's business.
#[async_trait]
pub trait RawStore: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Bytes>;

    async fn persist(&self, key: &str, data: Bytes) -> Result<UploadMetadata>;
}

/// Storage client wrapping object_store
#[derive(Clone)]
pub struct StorageClient {
    store: Arc<dyn ObjectStore>,
}

impl StorageClient {
    /// Create new storage client with any object_store backend
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Create in-memory storage for testing/development
    pub fn in_memory() -> Self {
        Self::new(Arc::new(object_store::memory::InMemory::new()))
    }

    /// Storage rooted at an existing local directory
    pub fn local(root: &std::path::Path) -> Result<Self> {
        Ok(Self::new(Arc::new(LocalFileSystem::new_with_prefix(root)?)))
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match config.provider {
            StorageProvider::Local => Self::local(&config.root),
            StorageProvider::Memory => Ok(Self::in_memory()),
        }
    }

    /// Check if key exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let path = StoragePath::from(key);

        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RawStore for StorageClient {
    async fn fetch(&self, key: &str) -> Result<Bytes> {
        let path = StoragePath::from(key);

        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let bytes = result.bytes().await?;

        tracing::info!(key, size = bytes.len(), "Read from storage");

        Ok(bytes)
    }

    async fn persist(&self, key: &str, data: Bytes) -> Result<UploadMetadata> {
        let path = StoragePath::from(key);
        let size = data.len();

        let put_result = self.store.put(&path, data.into()).await?;

        tracing::info!(key, size, "Wrote to storage");

        Ok(UploadMetadata {
            key: key.to_string(),
            etag: put_result.e_tag,
            size,
        })
    }
}
