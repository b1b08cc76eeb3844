//! Handlers for `/upload`: batch image upload and removal by URL.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use storehub_cloud::{upload_images, ObjectStore, StorageError, UploadFile, UploadReport};
use storehub_core::image_pipeline::MAX_UPLOAD_BYTES;
use storehub_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::ensure_store_owner;
use crate::middleware::rbac::RequireAdmin;
use crate::query::StoreParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Most files accepted in one request.
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Multipart field carrying the images.
const FILES_FIELD: &str = "files";

/// Request body ceiling for the upload route: every file at its limit plus
/// room for multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILES_PER_REQUEST * MAX_UPLOAD_BYTES + 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct DeleteUploads {
    pub urls: Vec<String>,
}

/// Store id encoded in `{prefix}/{store_id}/{file}`.
fn store_of_key(prefix: &str, key: &str) -> Option<DbId> {
    let prefix = prefix.trim_matches('/');
    let rest = if prefix.is_empty() {
        key
    } else {
        key.strip_prefix(prefix)?.strip_prefix('/')?
    };
    let (store, file) = rest.split_once('/')?;
    if file.is_empty() || file.contains('/') {
        return None;
    }
    store.parse().ok()
}

/// POST /api/upload?store_id=
///
/// Multipart with one or more `files` parts. Responds 201 with the report
/// when at least one file was stored, 400 when every file failed.
pub async fn upload(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StoreParams>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadReport>>)> {
    ensure_store_owner(&state.pool, params.store_id, &admin).await?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        if files.len() == MAX_FILES_PER_REQUEST {
            return Err(AppError::BadRequest(format!(
                "At most {MAX_FILES_PER_REQUEST} files may be uploaded at once"
            )));
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        files.push(UploadFile {
            file_name,
            data: data.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required '{FILES_FIELD}' field"
        )));
    }

    let submitted = files.len();
    let report = upload_images(state.storage.as_ref(), params.store_id, files).await;
    tracing::info!(
        store_id = params.store_id,
        user_id = admin.user_id,
        submitted,
        uploaded = report.uploaded.len(),
        failed = report.failed.len(),
        "Images uploaded"
    );

    if report.all_failed() {
        let reasons: Vec<String> = report
            .failed
            .iter()
            .map(|f| format!("{}: {}", f.file_name, f.error))
            .collect();
        return Err(AppError::BadRequest(format!(
            "No file could be uploaded ({})",
            reasons.join("; ")
        )));
    }

    Ok((StatusCode::CREATED, Json(DataResponse::new(report))))
}

/// DELETE /api/upload
///
/// Every URL must point into this bucket's prefix and at a store the caller
/// owns. All URLs are checked before anything is removed.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<DeleteUploads>,
) -> AppResult<StatusCode> {
    if input.urls.is_empty() {
        return Err(AppError::BadRequest("No URLs given".into()));
    }

    let mut keys = Vec::with_capacity(input.urls.len());
    for url in &input.urls {
        let key = state.storage.key_from_url(url)?;
        let store_id = store_of_key(state.storage.prefix(), &key)
            .ok_or_else(|| StorageError::ForeignUrl(url.clone()))?;
        ensure_store_owner(&state.pool, store_id, &admin).await?;
        keys.push(key);
    }

    for key in &keys {
        state.storage.delete(key).await?;
    }
    tracing::info!(user_id = admin.user_id, removed = keys.len(), "Images deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_id_from_prefixed_key() {
        assert_eq!(store_of_key("uploads", "uploads/42/a.webp"), Some(42));
        assert_eq!(store_of_key("/uploads/", "uploads/7/b.webp"), Some(7));
    }

    #[test]
    fn store_id_without_prefix() {
        assert_eq!(store_of_key("", "3/c.webp"), Some(3));
    }

    #[test]
    fn malformed_keys_have_no_store() {
        assert_eq!(store_of_key("uploads", "other/1/a.webp"), None);
        assert_eq!(store_of_key("uploads", "uploads/abc/a.webp"), None);
        assert_eq!(store_of_key("uploads", "uploads/1/x/a.webp"), None);
        assert_eq!(store_of_key("uploads", "uploads/1/"), None);
        assert_eq!(store_of_key("uploads", "uploadsx/1/a.webp"), None);
    }
}
