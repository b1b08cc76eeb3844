//! Handlers for the `/cart` resource. Every operation is scoped to the
//! authenticated user.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use storehub_core::error::CoreError;
use storehub_core::order::MAX_LINE_QUANTITY;
use storehub_core::pricing::line_subtotal;
use storehub_core::types::DbId;
use storehub_db::models::cart::{AddCartItem, CartItem, CartLine, CartView, UpdateCartItem};
use storehub_db::repositories::{CartRepo, ProductRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn item_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Cart item", id))
}

/// GET /api/cart
///
/// Lines are priced at the products' current effective prices.
pub async fn view(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CartView>>> {
    let items = CartRepo::list(&state.pool, user.user_id).await?;
    let ids: Vec<DbId> = items.iter().map(|i| i.product_id).collect();
    let products = ProductRepo::find_many(&state.pool, &ids).await?;
    let mut listings: HashMap<DbId, _> = ProductRepo::with_prices(&state.pool, products)
        .await?
        .into_iter()
        .map(|l| (l.product.id, l))
        .collect();

    let mut total = Decimal::ZERO;
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let Some(product) = listings.remove(&item.product_id) else {
            continue;
        };
        let subtotal = line_subtotal(product.effective_price, item.quantity);
        total += subtotal;
        lines.push(CartLine {
            id: item.id,
            quantity: item.quantity,
            product,
            subtotal,
        });
    }

    Ok(Json(DataResponse::new(CartView {
        items: lines,
        total,
    })))
}

/// POST /api/cart/items
///
/// Adding a product already in the cart increases its quantity, up to
/// the per-line limit.
pub async fn add_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AddCartItem>,
) -> AppResult<(StatusCode, Json<DataResponse<CartItem>>)> {
    input.validate()?;
    let product = ProductRepo::find_by_id(&state.pool, input.product_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Product", input.product_id)))?;
    if !product.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Product {} is not available for sale",
            product.id
        ))));
    }

    let item = CartRepo::add(&state.pool, user.user_id, input.product_id, input.quantity)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Cart line for product {} cannot exceed {MAX_LINE_QUANTITY} units",
                input.product_id
            )))
        })?;
    tracing::debug!(user_id = user.user_id, product_id = item.product_id, quantity = item.quantity, "Cart item added");
    Ok((StatusCode::CREATED, Json(DataResponse::new(item))))
}

/// PATCH /api/cart/items/{id}
pub async fn update_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCartItem>,
) -> AppResult<Json<DataResponse<CartItem>>> {
    input.validate()?;
    let item = CartRepo::set_quantity(&state.pool, user.user_id, id, input.quantity)
        .await?
        .ok_or_else(|| item_not_found(id))?;
    Ok(Json(DataResponse::new(item)))
}

/// DELETE /api/cart/items/{id}
pub async fn remove_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CartRepo::remove(&state.pool, user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(item_not_found(id))
    }
}

/// DELETE /api/cart
pub async fn clear(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    let removed = CartRepo::clear(&state.pool, user.user_id).await?;
    tracing::debug!(user_id = user.user_id, removed, "Cart cleared");
    Ok(StatusCode::NO_CONTENT)
}
