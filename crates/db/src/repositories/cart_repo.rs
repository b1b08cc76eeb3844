//! Repository for the `cart_items` table.

use sqlx::PgPool;
use storehub_core::order::MAX_LINE_QUANTITY;
use storehub_core::types::DbId;

use crate::models::cart::CartItem;

/// Column list for cart_items queries.
const COLUMNS: &str = "id, user_id, product_id, quantity, created_at, updated_at";

/// Provides cart operations scoped to one user.
pub struct CartRepo;

impl CartRepo {
    /// A user's cart items, oldest first.
    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<CartItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cart_items WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Add `quantity` of a product, incrementing an existing line.
    ///
    /// Returns `None` when the merged line would exceed
    /// [`MAX_LINE_QUANTITY`]; the stored line is left unchanged.
    pub async fn add(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        quantity: i32,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO cart_items (user_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_cart_items_user_product
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
             WHERE cart_items.quantity + EXCLUDED.quantity <= $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .bind(MAX_LINE_QUANTITY)
            .fetch_optional(pool)
            .await
    }

    /// Set the quantity of one of the user's lines. Returns `None` if the
    /// line does not exist or belongs to someone else.
    pub async fn set_quantity(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        quantity: i32,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "UPDATE cart_items SET quantity = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(id)
            .bind(user_id)
            .bind(quantity)
            .fetch_optional(pool)
            .await
    }

    pub async fn remove(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Empty the user's cart, returning the number of lines removed.
    pub async fn clear(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
