//! Order, order item, gift item and payment models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::order::{OrderStatus, PaymentMethod, PaymentStatus};
use storehub_core::types::{DbId, Money, Timestamp};
use validator::Validate;

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub store_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub tracking_code: uuid::Uuid,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub note: Option<String>,
    pub total_amount: Money,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub unit_price: Money,
    pub subtotal: Money,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderGiftItem {
    pub id: DbId,
    pub order_item_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub order_id: DbId,
    pub method: String,
    pub status: String,
    pub is_paid: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: OrderItem,
    pub gifts: Vec<OrderGiftItem>,
}

/// An order with its items and payment, as returned by read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    pub payment: Option<Payment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GiftItemInput {
    pub product_id: DbId,
    #[validate(range(min = 1, max = 1000))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderItem {
    pub product_id: DbId,
    #[validate(range(min = 1, max = 1000))]
    pub quantity: i32,
    #[serde(default)]
    #[validate(nested)]
    pub gifts: Vec<GiftItemInput>,
}

/// Body of `POST /orders`. The buyer is the authenticated user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    pub store_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub shipping_name: String,
    #[validate(length(min = 3, max = 40))]
    pub shipping_phone: String,
    #[validate(length(min = 1, max = 500))]
    pub shipping_address: String,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    #[validate(length(min = 1, max = 100), nested)]
    pub items: Vec<CreateOrderItem>,
}

/// Body of `PATCH /orders/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub is_paid: Option<bool>,
}

/// Query parameters for `GET /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListParams {
    pub store_id: DbId,
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /orders/mine`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyOrderParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
