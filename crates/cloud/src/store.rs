use async_trait::async_trait;

/// Error type for object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to store object '{key}': {message}")]
    Put { key: String, message: String },

    #[error("Failed to delete object '{key}': {message}")]
    Delete { key: String, message: String },

    /// The URL does not point into this store.
    #[error("URL is not managed by this store: {0}")]
    ForeignUrl(String),
}

/// A flat key/value blob store with public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Remove the object at `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL of the object at `key`.
    fn public_url(&self, key: &str) -> String;

    /// Inverse of [`public_url`](ObjectStore::public_url).
    fn key_from_url(&self, url: &str) -> Result<String, StorageError>;

    /// Key prefix under which uploads are written.
    fn prefix(&self) -> &str;
}
