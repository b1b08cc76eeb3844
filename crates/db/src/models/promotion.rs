//! Promotion model, attached products and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::error::CoreError;
use storehub_core::pricing::{DiscountType, ProductDiscount};
use storehub_core::types::{DbId, Money, Timestamp};
use validator::Validate;

/// A row from the `promotions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Promotion {
    pub id: DbId,
    pub store_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `promotion_products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PromotionProduct {
    pub id: DbId,
    pub promotion_id: DbId,
    pub product_id: DbId,
    pub discount: Money,
    pub discount_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromotionWithProducts {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub products: Vec<PromotionProduct>,
}

/// A discount from an active promotion, keyed by product.
///
/// Produced by the active-discount lookup, ordered by promotion-product id.
#[derive(Debug, Clone, FromRow)]
pub struct ActiveDiscountRow {
    pub product_id: DbId,
    pub promotion_id: DbId,
    pub discount: Money,
    pub discount_type: String,
}

impl TryFrom<ActiveDiscountRow> for ProductDiscount {
    type Error = CoreError;

    fn try_from(row: ActiveDiscountRow) -> Result<Self, Self::Error> {
        Ok(ProductDiscount {
            promotion_id: row.promotion_id,
            discount: row.discount,
            discount_type: DiscountType::parse(&row.discount_type)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromotionProductInput {
    pub product_id: DbId,
    pub discount: Money,
    pub discount_type: DiscountType,
}

/// DTO for creating a promotion.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePromotion {
    pub store_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub products: Vec<PromotionProductInput>,
}

/// DTO for updating a promotion. A present `products` list replaces the
/// attached products.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePromotion {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub is_active: Option<bool>,
    pub products: Option<Vec<PromotionProductInput>>,
}

/// Query parameters for `GET /promotion`.
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionListParams {
    pub store_id: DbId,
    #[serde(default)]
    pub active_only: bool,
}
