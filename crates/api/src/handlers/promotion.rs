//! Handlers for the `/promotion` resource.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use storehub_core::error::CoreError;
use storehub_core::pricing::validate_discount;
use storehub_core::promotion::validate_schedule;
use storehub_core::types::DbId;
use storehub_db::models::promotion::{
    CreatePromotion, Promotion, PromotionListParams, PromotionProductInput, PromotionWithProducts,
    UpdatePromotion,
};
use storehub_db::repositories::{ProductRepo, PromotionRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::ensure_store_owner;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Promotion", id))
}

/// Validate discounts and require every product to belong to `store_id`
/// and appear once.
async fn check_products(
    state: &AppState,
    store_id: DbId,
    products: &[PromotionProductInput],
) -> AppResult<()> {
    let mut seen = HashSet::new();
    for item in products {
        validate_discount(item.discount, item.discount_type)?;
        if !seen.insert(item.product_id) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Product {} is listed more than once",
                item.product_id
            ))));
        }
    }

    let ids: Vec<DbId> = seen.into_iter().collect();
    let found: HashSet<DbId> = ProductRepo::ids_in_store(&state.pool, store_id, &ids)
        .await?
        .into_iter()
        .collect();
    if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Product {missing} does not exist in store {store_id}"
        ))));
    }
    Ok(())
}

/// POST /api/promotion
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreatePromotion>,
) -> AppResult<(StatusCode, Json<DataResponse<PromotionWithProducts>>)> {
    input.validate()?;
    validate_schedule(input.start_date, input.end_date)?;
    ensure_store_owner(&state.pool, input.store_id, &admin).await?;
    check_products(&state, input.store_id, &input.products).await?;

    let promotion = PromotionRepo::create(&state.pool, &input).await?;
    tracing::info!(
        promotion_id = promotion.promotion.id,
        store_id = input.store_id,
        products = promotion.products.len(),
        "Promotion created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(promotion))))
}

/// GET /api/promotion?store_id=&active_only=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PromotionListParams>,
) -> AppResult<Json<DataResponse<Vec<Promotion>>>> {
    let promotions = PromotionRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(promotions)))
}

/// GET /api/promotion/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PromotionWithProducts>>> {
    let promotion = PromotionRepo::find_with_products(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(promotion)))
}

/// PATCH /api/promotion/{id}
///
/// A present `products` list replaces the attached products.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePromotion>,
) -> AppResult<Json<DataResponse<PromotionWithProducts>>> {
    input.validate()?;
    let existing = PromotionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    validate_schedule(
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.unwrap_or(existing.end_date),
    )?;
    if let Some(products) = &input.products {
        check_products(&state, existing.store_id, products).await?;
    }

    let promotion = PromotionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(promotion_id = id, store_id = existing.store_id, "Promotion updated");
    Ok(Json(DataResponse::new(promotion)))
}

/// DELETE /api/promotion/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = PromotionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    if PromotionRepo::delete(&state.pool, id).await? {
        tracing::info!(promotion_id = id, store_id = existing.store_id, "Promotion deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
