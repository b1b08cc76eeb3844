//! Handlers for the `/orders` resource.
//!
//! Placing an order decrements stock; cancelling it returns the stock. Both
//! happen in the repository transaction. Handlers publish `order.*` events
//! after the write commits.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use storehub_core::error::CoreError;
use storehub_core::order::{validate_item_count, OrderStatus};
use storehub_core::types::DbId;
use storehub_db::models::order::{
    CreateOrder, MyOrderParams, Order, OrderDetail, OrderListParams, UpdateOrder,
};
use storehub_db::repositories::OrderRepo;
use storehub_events::bus::{ORDER_PLACED, ORDER_STATUS_CHANGED};
use storehub_events::{OrderNotice, StoreEvent};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::ownership::ensure_store_owner;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found("Order", id))
}

fn notice(order: &Order, previous_status: Option<OrderStatus>) -> AppResult<OrderNotice> {
    Ok(OrderNotice {
        order_id: order.id,
        store_id: order.store_id,
        buyer_id: order.user_id,
        tracking_code: order.tracking_code,
        total_amount: order.total_amount,
        status: OrderStatus::parse(&order.status)?,
        previous_status,
    })
}

/// POST /api/orders
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<DataResponse<OrderDetail>>)> {
    validate_item_count(input.items.len())?;
    input.validate()?;

    let detail = OrderRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(
        order_id = detail.order.id,
        store_id = detail.order.store_id,
        user_id = user.user_id,
        items = detail.items.len(),
        total = %detail.order.total_amount,
        "Order placed"
    );

    let notice = notice(&detail.order, None)?;
    state
        .event_bus
        .publish(StoreEvent::order(ORDER_PLACED, &notice).with_actor(user.user_id));

    Ok((StatusCode::CREATED, Json(DataResponse::new(detail))))
}

/// GET /api/orders?store_id=&status=&limit=&offset=
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    ensure_store_owner(&state.pool, params.store_id, &admin).await?;
    let orders = OrderRepo::list_by_store(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(orders)))
}

/// GET /api/orders/mine
pub async fn list_mine(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<MyOrderParams>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    let orders = OrderRepo::list_by_user(&state.pool, user.user_id, &params).await?;
    Ok(Json(DataResponse::new(orders)))
}

/// GET /api/orders/{id}
///
/// Visible to the buyer and to the admin who owns the store.
pub async fn get_by_id(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderDetail>>> {
    let detail = OrderRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if detail.order.user_id != user.user_id {
        if !user.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "You cannot view this order".into(),
            )));
        }
        ensure_store_owner(&state.pool, detail.order.store_id, &user).await?;
    }
    Ok(Json(DataResponse::new(detail)))
}

/// GET /api/orders/track/{tracking_code}
///
/// Public lookup; the tracking code is the only credential.
pub async fn track(
    State(state): State<AppState>,
    Path(tracking_code): Path<uuid::Uuid>,
) -> AppResult<Json<DataResponse<OrderDetail>>> {
    let detail = OrderRepo::find_by_tracking_code(&state.pool, tracking_code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No order with tracking code {tracking_code}")))?;
    Ok(Json(DataResponse::new(detail)))
}

/// PATCH /api/orders/{id}
///
/// Any status may be set. Moving into `CANCELED` restores stock once.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrder>,
) -> AppResult<Json<DataResponse<OrderDetail>>> {
    let existing = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    let outcome = OrderRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    let notice = notice(&outcome.order.order, Some(outcome.previous_status))?;

    tracing::info!(
        order_id = id,
        store_id = existing.store_id,
        user_id = admin.user_id,
        from = %outcome.previous_status,
        to = %notice.status,
        stock_restored = outcome.stock_restored,
        "Order updated"
    );

    if notice.status != outcome.previous_status {
        state.event_bus.publish(
            StoreEvent::order(ORDER_STATUS_CHANGED, &notice).with_actor(admin.user_id),
        );
    }

    Ok(Json(DataResponse::new(outcome.order)))
}

/// DELETE /api/orders/{id}
///
/// Removes the order, its items, gift items and payment. Stock is not
/// returned; cancel first to restock.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_store_owner(&state.pool, existing.store_id, &admin).await?;

    if OrderRepo::delete(&state.pool, id).await? {
        tracing::info!(order_id = id, store_id = existing.store_id, user_id = admin.user_id, "Order deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
