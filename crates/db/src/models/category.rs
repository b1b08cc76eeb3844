//! Category model and DTOs.
//!
//! Categories form a tree per store; `position` is dense among siblings
//! sharing the same `parent_id` (NULL for roots).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::types::{DbId, Timestamp};
use validator::Validate;

use super::double_option;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub store_id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    pub store_id: DbId,
    pub parent_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub slug: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    /// Appends to the sibling list when omitted.
    pub position: Option<i32>,
}

/// DTO for updating a category.
///
/// `parent_id` distinguishes "leave as is" (absent) from "make root" (`null`).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<DbId>>,
    pub position: Option<i32>,
}

/// Query parameters for `GET /categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryListParams {
    pub store_id: DbId,
    /// Only children of this category.
    pub parent_id: Option<DbId>,
    /// Only root categories. Ignored when `parent_id` is set.
    #[serde(default)]
    pub roots_only: bool,
}
