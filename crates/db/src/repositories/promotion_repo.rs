//! Repository for the `promotions` and `promotion_products` tables.

use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use storehub_core::types::{DbId, Timestamp};

use crate::models::promotion::{
    ActiveDiscountRow, CreatePromotion, Promotion, PromotionListParams, PromotionProduct,
    PromotionProductInput, PromotionWithProducts, UpdatePromotion,
};

/// Column list for promotions queries.
const COLUMNS: &str =
    "id, store_id, name, description, start_date, end_date, is_active, created_at, updated_at";

/// Column list for promotion_products queries.
const PRODUCT_COLUMNS: &str = "id, promotion_id, product_id, discount, discount_type";

/// Provides CRUD operations for promotions and the discount lookups used by
/// price resolution.
pub struct PromotionRepo;

impl PromotionRepo {
    /// Insert a promotion with its product discounts in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePromotion,
    ) -> Result<PromotionWithProducts, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO promotions (store_id, name, description, start_date, end_date, is_active)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, true))
             RETURNING {COLUMNS}"
        );
        let promotion = sqlx::query_as::<_, Promotion>(&query)
            .bind(input.store_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        let products = insert_products(&mut tx, promotion.id, &input.products).await?;

        tx.commit().await?;
        Ok(PromotionWithProducts {
            promotion,
            products,
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Promotion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promotions WHERE id = $1");
        sqlx::query_as::<_, Promotion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a promotion with its attached products.
    pub async fn find_with_products(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PromotionWithProducts>, sqlx::Error> {
        let Some(promotion) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let products = Self::list_products(pool, id).await?;
        Ok(Some(PromotionWithProducts {
            promotion,
            products,
        }))
    }

    pub async fn list_products(
        pool: &PgPool,
        promotion_id: DbId,
    ) -> Result<Vec<PromotionProduct>, sqlx::Error> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM promotion_products
             WHERE promotion_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, PromotionProduct>(&query)
            .bind(promotion_id)
            .fetch_all(pool)
            .await
    }

    /// List a store's promotions, newest start date first.
    pub async fn list(
        pool: &PgPool,
        params: &PromotionListParams,
    ) -> Result<Vec<Promotion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM promotions
             WHERE store_id = $1 AND (NOT $2 OR is_active)
             ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, Promotion>(&query)
            .bind(params.store_id)
            .bind(params.active_only)
            .fetch_all(pool)
            .await
    }

    /// Update a promotion. A present `products` list replaces the attached
    /// products. Returns `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePromotion,
    ) -> Result<Option<PromotionWithProducts>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE promotions SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(promotion) = sqlx::query_as::<_, Promotion>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_active)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let products = match &input.products {
            Some(replacement) => {
                sqlx::query("DELETE FROM promotion_products WHERE promotion_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                insert_products(&mut tx, id, replacement).await?
            }
            None => {
                let query = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM promotion_products
                     WHERE promotion_id = $1 ORDER BY id ASC"
                );
                sqlx::query_as::<_, PromotionProduct>(&query)
                    .bind(id)
                    .fetch_all(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(Some(PromotionWithProducts {
            promotion,
            products,
        }))
    }

    /// Delete a promotion; its product rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate every active promotion whose end date is before `now`.
    ///
    /// Idempotent: a second run with the same `now` affects no rows.
    pub async fn deactivate_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE promotions SET is_active = false
             WHERE end_date < $1 AND is_active = true",
        )
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Discounts from active promotions for the given products.
    ///
    /// Rows are ordered by promotion-product id so that the first row per
    /// product is the one that applies.
    pub async fn active_discounts<'e, E>(
        executor: E,
        product_ids: &[DbId],
    ) -> Result<Vec<ActiveDiscountRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ActiveDiscountRow>(
            "SELECT pp.product_id, pp.promotion_id, pp.discount, pp.discount_type
             FROM promotion_products pp
             JOIN promotions p ON p.id = pp.promotion_id
             WHERE pp.product_id = ANY($1) AND p.is_active = true
             ORDER BY pp.id ASC",
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await
    }
}

async fn insert_products(
    tx: &mut Transaction<'_, Postgres>,
    promotion_id: DbId,
    products: &[PromotionProductInput],
) -> Result<Vec<PromotionProduct>, sqlx::Error> {
    let query = format!(
        "INSERT INTO promotion_products (promotion_id, product_id, discount, discount_type)
         VALUES ($1, $2, $3, $4)
         RETURNING {PRODUCT_COLUMNS}"
    );
    let mut rows = Vec::with_capacity(products.len());
    for p in products {
        let row = sqlx::query_as::<_, PromotionProduct>(&query)
            .bind(promotion_id)
            .bind(p.product_id)
            .bind(p.discount)
            .bind(p.discount_type.as_str())
            .fetch_one(&mut **tx)
            .await?;
        rows.push(row);
    }
    Ok(rows)
}
