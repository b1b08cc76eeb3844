//! Handlers for the `/stores` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use storehub_core::error::CoreError;
use storehub_core::naming::resolve_slug;
use storehub_core::types::DbId;
use storehub_db::models::store::{CreateStore, Store, UpdateStore};
use storehub_db::repositories::StoreRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::ensure_store_owner;
use crate::middleware::rbac::RequireAdmin;
use crate::query::StoreListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/stores
///
/// The calling admin becomes the store's owner.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateStore>,
) -> AppResult<(StatusCode, Json<DataResponse<Store>>)> {
    input.validate()?;
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    let store = StoreRepo::create(&state.pool, admin.user_id, &input, &slug).await?;
    tracing::info!(store_id = store.id, user_id = admin.user_id, "Store created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(store))))
}

/// GET /api/stores
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StoreListParams>,
) -> AppResult<Json<DataResponse<Vec<Store>>>> {
    let stores = StoreRepo::list(&state.pool, params.owner_id).await?;
    Ok(Json(DataResponse::new(stores)))
}

/// GET /api/stores/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Store>>> {
    let store = StoreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Store", id)))?;
    Ok(Json(DataResponse::new(store)))
}

/// PATCH /api/stores/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStore>,
) -> AppResult<Json<DataResponse<Store>>> {
    input.validate()?;
    ensure_store_owner(&state.pool, id, &admin).await?;

    let slug = input
        .slug
        .as_deref()
        .map(|s| resolve_slug(Some(s), s))
        .transpose()?;

    let store = StoreRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Store", id)))?;
    tracing::info!(store_id = id, user_id = admin.user_id, "Store updated");
    Ok(Json(DataResponse::new(store)))
}

/// DELETE /api/stores/{id}
///
/// Catalog rows cascade; a store with orders cannot be deleted.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_store_owner(&state.pool, id, &admin).await?;
    if StoreRepo::delete(&state.pool, id).await? {
        tracing::info!(store_id = id, user_id = admin.user_id, "Store deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Store", id)))
    }
}
