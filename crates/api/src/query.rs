//! Shared query parameter types for API handlers.

use serde::Deserialize;
use storehub_core::types::DbId;

/// `?store_id=` for list endpoints scoped to one store.
#[derive(Debug, Deserialize)]
pub struct StoreParams {
    pub store_id: DbId,
}

/// `?owner_id=` filter for the store list.
#[derive(Debug, Default, Deserialize)]
pub struct StoreListParams {
    pub owner_id: Option<DbId>,
}
