//! Batch image upload.
//!
//! Every file is decoded, bounded to [`MAX_DIMENSION`] on both axes, encoded
//! as WebP and written to the store. At most [`UPLOAD_CONCURRENCY`] files are
//! in flight at once. One file failing does not stop the others; the report
//! lists both outcomes.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use storehub_core::error::CoreError;
use storehub_core::image_pipeline::{to_webp, MAX_DIMENSION, WEBP_CONTENT_TYPE};
use storehub_core::types::DbId;

use crate::keys;
use crate::store::ObjectStore;

/// Files processed concurrently.
pub const UPLOAD_CONCURRENCY: usize = 4;

/// One file received from the client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    pub file_name: String,
    pub key: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedUpload {
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    pub uploaded: Vec<UploadedImage>,
    pub failed: Vec<FailedUpload>,
}

impl UploadReport {
    /// True when files were submitted and none of them made it.
    pub fn all_failed(&self) -> bool {
        self.uploaded.is_empty() && !self.failed.is_empty()
    }
}

/// Convert and store `files` for `store_id`.
///
/// Results are reported in completion order, not submission order.
pub async fn upload_images(
    store: &dyn ObjectStore,
    store_id: DbId,
    files: Vec<UploadFile>,
) -> UploadReport {
    let outcomes: Vec<Result<UploadedImage, FailedUpload>> = stream::iter(files)
        .map(|file| upload_one(store, store_id, file))
        .buffer_unordered(UPLOAD_CONCURRENCY)
        .collect()
        .await;

    let mut report = UploadReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(image) => report.uploaded.push(image),
            Err(failure) => {
                tracing::warn!(file = %failure.file_name, error = %failure.error, "Image upload failed");
                report.failed.push(failure);
            }
        }
    }
    report
}

async fn upload_one(
    store: &dyn ObjectStore,
    store_id: DbId,
    file: UploadFile,
) -> Result<UploadedImage, FailedUpload> {
    let UploadFile { file_name, data } = file;
    let fail = |error: String| FailedUpload {
        file_name: file_name.clone(),
        error,
    };

    // Decoding and encoding are CPU-bound.
    let processed = tokio::task::spawn_blocking(move || to_webp(&data, MAX_DIMENSION))
        .await
        .map_err(|e| fail(format!("Image worker failed: {e}")))?
        .map_err(|e| match e {
            CoreError::Validation(msg) | CoreError::Internal(msg) => fail(msg),
            other => fail(other.to_string()),
        })?;

    let key = keys::image_key(store.prefix(), store_id, uuid::Uuid::new_v4());
    store
        .put(&key, processed.bytes, WEBP_CONTENT_TYPE)
        .await
        .map_err(|e| fail(e.to_string()))?;

    Ok(UploadedImage {
        url: store.public_url(&key),
        file_name,
        key,
        width: processed.width,
        height: processed.height,
    })
}
