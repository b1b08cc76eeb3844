//! Repository for the `brands` table.

use sqlx::PgPool;
use storehub_core::types::DbId;

use crate::models::brand::{Brand, CreateBrand, UpdateBrand};
use crate::repositories::position::{self, OrderedTable, PositionScope};

/// Column list for brands queries.
const COLUMNS: &str = "id, store_id, name, logo_url, position, created_at, updated_at";

/// Provides CRUD operations for brands, keeping positions dense per store.
pub struct BrandRepo;

impl BrandRepo {
    /// Insert a brand at its requested position (appending when omitted).
    pub async fn create(pool: &PgPool, input: &CreateBrand) -> Result<Brand, sqlx::Error> {
        let mut tx = pool.begin().await?;
        position::lock_store(&mut tx, input.store_id).await?;

        let scope = PositionScope::brands(input.store_id);
        let pos = position::open_slot(&mut tx, &scope, input.position).await?;

        let query = format!(
            "INSERT INTO brands (store_id, name, logo_url, position)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let brand = sqlx::query_as::<_, Brand>(&query)
            .bind(input.store_id)
            .bind(&input.name)
            .bind(&input.logo_url)
            .bind(pos)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(brand)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Brand>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brands WHERE id = $1");
        sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a store's brands in display order.
    pub async fn list_by_store(pool: &PgPool, store_id: DbId) -> Result<Vec<Brand>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM brands WHERE store_id = $1 ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(store_id)
            .fetch_all(pool)
            .await
    }

    /// Update a brand, moving it when `position` is given.
    ///
    /// Returns `None` if the brand does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBrand,
    ) -> Result<Option<Brand>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(store_id) = position::lock_store_of(&mut tx, OrderedTable::Brands, id).await?
        else {
            return Ok(None);
        };

        let current: (i32,) = sqlx::query_as("SELECT position FROM brands WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let pos = match input.position {
            Some(requested) => {
                let scope = PositionScope::brands(store_id);
                position::move_within(&mut tx, &scope, id, current.0, requested).await?
            }
            None => current.0,
        };

        let query = format!(
            "UPDATE brands SET
                name = COALESCE($2, name),
                logo_url = COALESCE($3, logo_url),
                position = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let brand = sqlx::query_as::<_, Brand>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.logo_url)
            .bind(pos)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(brand))
    }

    /// Delete a brand and close the gap it leaves. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(store_id) = position::lock_store_of(&mut tx, OrderedTable::Brands, id).await?
        else {
            return Ok(false);
        };

        let (deleted,): (i32,) = sqlx::query_as("DELETE FROM brands WHERE id = $1 RETURNING position")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        position::close_gap(&mut tx, &PositionScope::brands(store_id), deleted, None).await?;

        tx.commit().await?;
        Ok(true)
    }
}
