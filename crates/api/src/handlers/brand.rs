//! Handlers for the `/brands` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use storehub_core::error::CoreError;
use storehub_core::types::DbId;
use storehub_db::models::brand::{Brand, CreateBrand, UpdateBrand};
use storehub_db::repositories::BrandRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::ensure_store_owner;
use crate::middleware::rbac::RequireAdmin;
use crate::query::StoreParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Brand", id))
}

/// POST /api/brands
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBrand>,
) -> AppResult<(StatusCode, Json<DataResponse<Brand>>)> {
    input.validate()?;
    ensure_store_owner(&state.pool, input.store_id, &admin).await?;
    let brand = BrandRepo::create(&state.pool, &input).await?;
    tracing::info!(
        brand_id = brand.id,
        store_id = brand.store_id,
        position = brand.position,
        "Brand created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(brand))))
}

/// GET /api/brands?store_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<StoreParams>,
) -> AppResult<Json<DataResponse<Vec<Brand>>>> {
    let brands = BrandRepo::list_by_store(&state.pool, params.store_id).await?;
    Ok(Json(DataResponse::new(brands)))
}

/// GET /api/brands/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Brand>>> {
    let brand = BrandRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(brand)))
}

/// PATCH /api/brands/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBrand>,
) -> AppResult<Json<DataResponse<Brand>>> {
    input.validate()?;
    let existing = BrandRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    let brand = BrandRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(brand_id = id, store_id = brand.store_id, position = brand.position, "Brand updated");
    Ok(Json(DataResponse::new(brand)))
}

/// DELETE /api/brands/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = BrandRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    if BrandRepo::delete(&state.pool, id).await? {
        tracing::info!(brand_id = id, store_id = existing.store_id, "Brand deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
