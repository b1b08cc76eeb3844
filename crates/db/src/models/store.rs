//! Store (tenant) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storehub_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `stores` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Store {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a store. The owner is the authenticated admin.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStore {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Derived from `name` when omitted.
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating a store. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStore {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
