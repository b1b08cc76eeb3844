//! Amazon S3 implementation of [`ObjectStore`].

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use aws_smithy_types::timeout::TimeoutConfig;

use crate::keys;
use crate::store::{ObjectStore, StorageError};

/// Upper bound for a single S3 operation, retries included.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default key prefix when `AWS_S3_PREFIX` is not set.
const DEFAULT_PREFIX: &str = "uploads";

/// S3 bucket settings.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub prefix: String,
}

impl S3Config {
    /// Load from the environment.
    ///
    /// Returns `None` unless both `AWS_S3_BUCKET` and `AWS_REGION` are set.
    ///
    /// | Variable        | Required | Default   |
    /// |-----------------|----------|-----------|
    /// | `AWS_S3_BUCKET` | yes      |           |
    /// | `AWS_REGION`    | yes      |           |
    /// | `AWS_S3_PREFIX` | no       | `uploads` |
    pub fn from_env() -> Option<Self> {
        let bucket = std::env::var("AWS_S3_BUCKET").ok()?;
        let region = std::env::var("AWS_REGION").ok()?;
        Some(Self {
            bucket,
            region,
            prefix: std::env::var("AWS_S3_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
        })
    }
}

/// Stores objects in one S3 bucket.
pub struct S3Store {
    client: Client,
    config: S3Config,
    base_url: String,
}

impl S3Store {
    /// Build a client from the default AWS credential chain for `config.region`.
    pub async fn connect(config: S3Config) -> Self {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(OPERATION_TIMEOUT)
            .build();
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .timeout_config(timeouts)
            .load()
            .await;
        Self::new(Client::new(&aws_config), config)
    }

    pub fn new(client: Client, config: S3Config) -> Self {
        let base_url = keys::s3_base_url(&config.bucket, &config.region);
        Self {
            client,
            config,
            base_url,
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(bucket = %self.config.bucket, key, "Object stored");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(bucket = %self.config.bucket, key, "Object deleted");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{key}", self.base_url)
    }

    fn key_from_url(&self, url: &str) -> Result<String, StorageError> {
        keys::key_under_prefix(&self.base_url, &self.config.prefix, url)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))
    }

    fn prefix(&self) -> &str {
        &self.config.prefix
    }
}
