//! Repository for the `stores` table.

use sqlx::PgPool;
use storehub_core::types::DbId;

use crate::models::store::{CreateStore, Store, UpdateStore};

/// Column list for stores queries.
const COLUMNS: &str = "id, user_id, name, slug, description, is_active, created_at, updated_at";

/// Provides CRUD operations for stores.
pub struct StoreRepo;

impl StoreRepo {
    /// Insert a store owned by `user_id` with an already-resolved slug.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateStore,
        slug: &str,
    ) -> Result<Store, sqlx::Error> {
        let query = format!(
            "INSERT INTO stores (user_id, name, slug, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Store>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE id = $1");
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List stores, optionally only those owned by `owner_id`.
    pub async fn list(pool: &PgPool, owner_id: Option<DbId>) -> Result<Vec<Store>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stores
             WHERE $1::BIGINT IS NULL OR user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Store>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a store. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStore,
        slug: Option<&str>,
    ) -> Result<Option<Store>, sqlx::Error> {
        let query = format!(
            "UPDATE stores SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a store and its catalog. Stores with orders cannot be deleted
    /// (foreign key violation).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
