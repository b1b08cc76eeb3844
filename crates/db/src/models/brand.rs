//! Brand model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `brands` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brand {
    pub id: DbId,
    pub store_id: DbId,
    pub name: String,
    pub logo_url: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a brand.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBrand {
    pub store_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub position: Option<i32>,
}

/// DTO for updating a brand.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBrand {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub position: Option<i32>,
}
