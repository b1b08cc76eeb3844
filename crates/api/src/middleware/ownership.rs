//! Tenant checks: an admin may only manage the stores they own.

use storehub_core::error::CoreError;
use storehub_core::types::DbId;
use storehub_db::models::store::Store;
use storehub_db::repositories::StoreRepo;
use storehub_db::DbPool;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};

/// Load `store_id` and require `user` to own it.
///
/// 404 when the store does not exist, 403 when it belongs to someone else.
pub async fn ensure_store_owner(
    pool: &DbPool,
    store_id: DbId,
    user: &AuthUser,
) -> AppResult<Store> {
    let store = StoreRepo::find_by_id(pool, store_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Store", store_id)))?;
    if store.user_id != user.user_id {
        tracing::warn!(store_id, user_id = user.user_id, "Store ownership check failed");
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not manage this store".into(),
        )));
    }
    Ok(store)
}

/// Gate for `include_inactive` on public list endpoints: hidden rows are
/// shown only to the admin who owns `store_id`.
pub async fn ensure_can_list_hidden(
    pool: &DbPool,
    store_id: Option<DbId>,
    user: Option<&AuthUser>,
) -> AppResult<()> {
    let user = user.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Sign in to list inactive items".into(),
        ))
    })?;
    if !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )));
    }
    let store_id = store_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "include_inactive requires store_id".into(),
        ))
    })?;
    ensure_store_owner(pool, store_id, user).await?;
    Ok(())
}
