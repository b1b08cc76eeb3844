//! Repository for the `banners` table.

use sqlx::PgPool;
use storehub_core::types::DbId;

use crate::models::banner::{Banner, CreateBanner, UpdateBanner};
use crate::repositories::position::{self, OrderedTable, PositionScope};

/// Column list for banners queries.
const COLUMNS: &str =
    "id, store_id, title, image_url, link_url, is_active, position, created_at, updated_at";

/// Provides CRUD operations for storefront banners.
pub struct BannerRepo;

impl BannerRepo {
    pub async fn create(pool: &PgPool, input: &CreateBanner) -> Result<Banner, sqlx::Error> {
        let mut tx = pool.begin().await?;
        position::lock_store(&mut tx, input.store_id).await?;

        let scope = PositionScope::banners(input.store_id);
        let pos = position::open_slot(&mut tx, &scope, input.position).await?;

        let query = format!(
            "INSERT INTO banners (store_id, title, image_url, link_url, is_active, position)
             VALUES ($1, $2, $3, $4, COALESCE($5, true), $6)
             RETURNING {COLUMNS}"
        );
        let banner = sqlx::query_as::<_, Banner>(&query)
            .bind(input.store_id)
            .bind(&input.title)
            .bind(&input.image_url)
            .bind(&input.link_url)
            .bind(input.is_active)
            .bind(pos)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(banner)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Banner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM banners WHERE id = $1");
        sqlx::query_as::<_, Banner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a store's banners in display order.
    ///
    /// Inactive banners keep their slot but are hidden unless requested.
    pub async fn list_by_store(
        pool: &PgPool,
        store_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Banner>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM banners
             WHERE store_id = $1 AND ($2 OR is_active)
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Banner>(&query)
            .bind(store_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBanner,
    ) -> Result<Option<Banner>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(store_id) = position::lock_store_of(&mut tx, OrderedTable::Banners, id).await?
        else {
            return Ok(None);
        };

        let (current,): (i32,) = sqlx::query_as("SELECT position FROM banners WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let pos = match input.position {
            Some(requested) => {
                let scope = PositionScope::banners(store_id);
                position::move_within(&mut tx, &scope, id, current, requested).await?
            }
            None => current,
        };

        let query = format!(
            "UPDATE banners SET
                title = COALESCE($2, title),
                image_url = COALESCE($3, image_url),
                link_url = COALESCE($4, link_url),
                is_active = COALESCE($5, is_active),
                position = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let banner = sqlx::query_as::<_, Banner>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.image_url)
            .bind(&input.link_url)
            .bind(input.is_active)
            .bind(pos)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(banner))
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(store_id) = position::lock_store_of(&mut tx, OrderedTable::Banners, id).await?
        else {
            return Ok(false);
        };

        let (deleted,): (i32,) =
            sqlx::query_as("DELETE FROM banners WHERE id = $1 RETURNING position")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        position::close_gap(&mut tx, &PositionScope::banners(store_id), deleted, None).await?;

        tx.commit().await?;
        Ok(true)
    }
}
