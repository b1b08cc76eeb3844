//! In-memory [`ObjectStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::keys;
use crate::store::{ObjectStore, StorageError};

/// A stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Keeps objects in a map; URLs use the same layout as S3.
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    base_url: String,
    prefix: String,
}

impl MemoryStore {
    pub fn new(bucket: &str, region: &str, prefix: &str) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            base_url: keys::s3_base_url(bucket, region),
            prefix: prefix.to_string(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("local", "us-east-1", "uploads")
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{key}", self.base_url)
    }

    fn key_from_url(&self, url: &str) -> Result<String, StorageError> {
        keys::key_under_prefix(&self.base_url, &self.prefix, url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }
}
