//! Handlers for the `/banners` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use storehub_core::error::CoreError;
use storehub_core::types::DbId;
use storehub_db::models::banner::{Banner, BannerListParams, CreateBanner, UpdateBanner};
use storehub_db::repositories::BannerRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::{ensure_can_list_hidden, ensure_store_owner};
use crate::middleware::rbac::{MaybeAuth, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Banner", id))
}

/// POST /api/banners
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBanner>,
) -> AppResult<(StatusCode, Json<DataResponse<Banner>>)> {
    input.validate()?;
    ensure_store_owner(&state.pool, input.store_id, &admin).await?;
    let banner = BannerRepo::create(&state.pool, &input).await?;
    tracing::info!(
        banner_id = banner.id,
        store_id = banner.store_id,
        position = banner.position,
        "Banner created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(banner))))
}

/// GET /api/banners?store_id=&include_inactive=
///
/// `include_inactive` is reserved for the admin who owns the store.
pub async fn list(
    MaybeAuth(user): MaybeAuth,
    State(state): State<AppState>,
    Query(params): Query<BannerListParams>,
) -> AppResult<Json<DataResponse<Vec<Banner>>>> {
    if params.include_inactive {
        ensure_can_list_hidden(&state.pool, Some(params.store_id), user.as_ref()).await?;
    }
    let banners =
        BannerRepo::list_by_store(&state.pool, params.store_id, params.include_inactive).await?;
    Ok(Json(DataResponse::new(banners)))
}

/// GET /api/banners/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Banner>>> {
    let banner = BannerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(banner)))
}

/// PATCH /api/banners/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBanner>,
) -> AppResult<Json<DataResponse<Banner>>> {
    input.validate()?;
    let existing = BannerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    let banner = BannerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(banner_id = id, store_id = banner.store_id, position = banner.position, "Banner updated");
    Ok(Json(DataResponse::new(banner)))
}

/// DELETE /api/banners/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = BannerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    if BannerRepo::delete(&state.pool, id).await? {
        tracing::info!(banner_id = id, store_id = existing.store_id, "Banner deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
