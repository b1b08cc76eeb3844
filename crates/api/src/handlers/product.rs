//! Handlers for the `/products` resource.
//!
//! Every product read carries its `effective_price`: the list price after the
//! first discount from an active promotion.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use storehub_core::error::CoreError;
use storehub_core::naming::resolve_slug;
use storehub_core::types::{DbId, Money};
use storehub_db::models::product::{
    CreateProduct, ProductDetail, ProductListParams, ProductListing, UpdateProduct,
};
use storehub_db::repositories::{BrandRepo, CategoryRepo, ProductRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::{ensure_can_list_hidden, ensure_store_owner};
use crate::middleware::rbac::{MaybeAuth, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Product", id))
}

fn check_price(price: Money) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::Core(CoreError::Validation(
            "Price must not be negative".into(),
        )));
    }
    Ok(())
}

/// Require the referenced category and brand to belong to `store_id`.
async fn check_references(
    state: &AppState,
    store_id: DbId,
    category_id: Option<DbId>,
    brand_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(category_id) = category_id {
        let category = CategoryRepo::find_by_id(&state.pool, category_id).await?;
        if !matches!(category, Some(c) if c.store_id == store_id) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Category {category_id} does not exist in store {store_id}"
            ))));
        }
    }
    if let Some(brand_id) = brand_id {
        let brand = BrandRepo::find_by_id(&state.pool, brand_id).await?;
        if !matches!(brand, Some(b) if b.store_id == store_id) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Brand {brand_id} does not exist in store {store_id}"
            ))));
        }
    }
    Ok(())
}

async fn load_detail(state: &AppState, id: DbId) -> AppResult<ProductDetail> {
    ProductRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/products
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductDetail>>)> {
    input.validate()?;
    check_price(input.price)?;
    ensure_store_owner(&state.pool, input.store_id, &admin).await?;
    check_references(&state, input.store_id, input.category_id, input.brand_id).await?;

    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    let product = ProductRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(
        product_id = product.id,
        store_id = product.store_id,
        stock = product.stock,
        "Product created"
    );

    let detail = load_detail(&state, product.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(detail))))
}

/// GET /api/products?store_id=&category_id=&brand_id=&search=&include_inactive=&limit=&offset=
///
/// `include_inactive` is reserved for the admin who owns `store_id`.
pub async fn list(
    MaybeAuth(user): MaybeAuth,
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<DataResponse<Vec<ProductListing>>>> {
    if params.include_inactive {
        ensure_can_list_hidden(&state.pool, params.store_id, user.as_ref()).await?;
    }
    let products = ProductRepo::list(&state.pool, &params).await?;
    let listings = ProductRepo::with_prices(&state.pool, products).await?;
    Ok(Json(DataResponse::new(listings)))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductDetail>>> {
    Ok(Json(DataResponse::new(load_detail(&state, id).await?)))
}

/// PATCH /api/products/{id}
///
/// Present `images`, `colors` or `sizes` lists replace the stored ones.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<DataResponse<ProductDetail>>> {
    input.validate()?;
    if let Some(price) = input.price {
        check_price(price)?;
    }
    let existing = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;
    check_references(
        &state,
        existing.store_id,
        input.category_id.flatten(),
        input.brand_id.flatten(),
    )
    .await?;

    let slug = input
        .slug
        .as_deref()
        .map(|s| resolve_slug(Some(s), s))
        .transpose()?;

    ProductRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(product_id = id, store_id = existing.store_id, "Product updated");

    Ok(Json(DataResponse::new(load_detail(&state, id).await?)))
}

/// DELETE /api/products/{id}
///
/// Products referenced by orders cannot be deleted (400); deactivate them
/// instead.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    if ProductRepo::delete(&state.pool, id).await? {
        tracing::info!(product_id = id, store_id = existing.store_id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
