//! Product model, child rows (images, colors, sizes) and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::pricing::{ProductDiscount, ResolvedPrice};
use storehub_core::types::{DbId, Money, Timestamp};
use validator::Validate;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub store_id: DbId,
    pub category_id: Option<DbId>,
    pub brand_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductImage {
    pub id: DbId,
    pub product_id: DbId,
    pub url: String,
    pub position: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductColor {
    pub id: DbId,
    pub product_id: DbId,
    pub name: String,
    pub hex_code: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductSize {
    pub id: DbId,
    pub product_id: DbId,
    pub name: String,
}

/// A product as listed by the storefront: the row plus its resolved price.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub effective_price: Money,
    pub promotion: Option<ProductDiscount>,
}

impl ProductListing {
    pub fn new(product: Product, resolved: ResolvedPrice) -> Self {
        Self {
            product,
            effective_price: resolved.effective_price,
            promotion: resolved.applied,
        }
    }
}

/// Full product detail including child collections.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub listing: ProductListing,
    pub images: Vec<ProductImage>,
    pub colors: Vec<ProductColor>,
    pub sizes: Vec<ProductSize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ColorInput {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(length(max = 9))]
    pub hex_code: Option<String>,
}

/// DTO for creating a product.
///
/// `images` are stored in the given order; `colors` and `sizes` as-is.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    pub store_id: DbId,
    pub category_id: Option<DbId>,
    pub brand_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Money,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub colors: Vec<ColorInput>,
    #[serde(default)]
    pub sizes: Vec<String>,
}

/// DTO for updating a product.
///
/// A present child collection replaces the existing one entirely.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[serde(default, deserialize_with = "super::double_option")]
    pub category_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub brand_id: Option<Option<DbId>>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    pub images: Option<Vec<String>>,
    #[validate(nested)]
    pub colors: Option<Vec<ColorInput>>,
    pub sizes: Option<Vec<String>>,
}

/// Query parameters for `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListParams {
    pub store_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub brand_id: Option<DbId>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
