//! Shopping cart models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::types::{DbId, Money, Timestamp};
use validator::Validate;

use super::product::ProductListing;

/// A row from the `cart_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItem {
    pub id: DbId,
    pub user_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line with its product and resolved unit price.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: DbId,
    pub quantity: i32,
    pub product: ProductListing,
    pub subtotal: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: Money,
}

/// Body of `POST /cart/items`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddCartItem {
    pub product_id: DbId,
    #[validate(range(min = 1, max = 1000))]
    pub quantity: i32,
}

/// Body of `PATCH /cart/items/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCartItem {
    #[validate(range(min = 1, max = 1000))]
    pub quantity: i32,
}
