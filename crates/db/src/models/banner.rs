//! Banner model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `banners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Banner {
    pub id: DbId,
    pub store_id: DbId,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a banner.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBanner {
    pub store_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(url)]
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: Option<bool>,
    pub position: Option<i32>,
}

/// DTO for updating a banner.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBanner {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: Option<bool>,
    pub position: Option<i32>,
}

/// Query parameters for `GET /banners`.
#[derive(Debug, Clone, Deserialize)]
pub struct BannerListParams {
    pub store_id: DbId,
    #[serde(default)]
    pub include_inactive: bool,
}
