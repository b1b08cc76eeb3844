//! Repository for orders, their items, gift items and payments.
//!
//! Order creation and cancellation adjust `products.stock` in the same
//! transaction as the order rows. Stock is decremented with a conditional
//! update so it never goes negative; a shortfall aborts the whole order.

use std::collections::HashMap;

use sqlx::PgPool;
use storehub_core::order::{new_tracking_code, restores_stock, OrderStatus};
use storehub_core::pricing::{line_subtotal, resolve_price};
use storehub_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use storehub_core::types::{DbId, Money};

use crate::models::order::{
    CreateOrder, MyOrderParams, Order, OrderDetail, OrderGiftItem, OrderItem, OrderItemDetail,
    OrderListParams, Payment, UpdateOrder,
};
use crate::models::product::Product;
use crate::repositories::product_repo::discounts_by_product;

/// Column list for orders queries.
const COLUMNS: &str = "id, store_id, user_id, status, tracking_code, shipping_name, \
    shipping_phone, shipping_address, note, total_amount, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, unit_price, subtotal";

const GIFT_COLUMNS: &str = "id, order_item_id, product_id, quantity";

const PAYMENT_COLUMNS: &str = "id, order_id, method, status, is_paid, created_at, updated_at";

/// Failures of order writes that callers need to tell apart.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Product {product_id} does not exist in store {store_id}")]
    UnknownProduct { product_id: DbId, store_id: DbId },

    #[error("Product {product_id} is not available for sale")]
    InactiveProduct { product_id: DbId },

    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: DbId,
        requested: i32,
        available: i32,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Outcome of a successful [`OrderRepo::update`].
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub previous_status: OrderStatus,
    pub order: OrderDetail,
    /// Whether ordered quantities were returned to stock.
    pub stock_restored: bool,
}

/// Provides the order lifecycle: create, update status, remove, and reads.
pub struct OrderRepo;

impl OrderRepo {
    /// Place an order for `user_id`.
    ///
    /// In one transaction: lock the ordered products, price each line at its
    /// effective (promotion-resolved) price, insert the order, items, gift
    /// items and payment, decrement stock, and drop the purchased products
    /// from the buyer's cart.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateOrder,
    ) -> Result<OrderDetail, OrderError> {
        let mut tx = pool.begin().await?;

        let mut product_ids: Vec<DbId> = input
            .items
            .iter()
            .flat_map(|item| {
                std::iter::once(item.product_id).chain(item.gifts.iter().map(|g| g.product_id))
            })
            .collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let products: HashMap<DbId, Product> = sqlx::query_as::<_, Product>(&format!(
            "SELECT id, store_id, category_id, brand_id, name, slug, description, \
                price, stock, is_active, created_at, updated_at
             FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

        for id in &product_ids {
            match products.get(id) {
                Some(p) if p.store_id != input.store_id => {
                    return Err(OrderError::UnknownProduct {
                        product_id: *id,
                        store_id: input.store_id,
                    })
                }
                Some(p) if !p.is_active => {
                    return Err(OrderError::InactiveProduct { product_id: *id })
                }
                Some(_) => {}
                None => {
                    return Err(OrderError::UnknownProduct {
                        product_id: *id,
                        store_id: input.store_id,
                    })
                }
            }
        }

        let mut discounts = discounts_by_product(&mut *tx, &product_ids).await?;
        let mut unit_prices: HashMap<DbId, Money> = HashMap::new();
        for (id, product) in &products {
            let applicable = discounts.remove(id).unwrap_or_default();
            unit_prices.insert(*id, resolve_price(product.price, &applicable).effective_price);
        }

        let lines: Vec<(Money, Money)> = input
            .items
            .iter()
            .map(|item| {
                let unit = unit_prices
                    .get(&item.product_id)
                    .copied()
                    .unwrap_or_default();
                (unit, line_subtotal(unit, item.quantity))
            })
            .collect();
        let total: Money = lines.iter().map(|(_, subtotal)| *subtotal).sum();

        let query = format!(
            "INSERT INTO orders
                (store_id, user_id, status, tracking_code, shipping_name, shipping_phone,
                 shipping_address, note, total_amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(input.store_id)
            .bind(user_id)
            .bind(OrderStatus::Ordered.as_str())
            .bind(new_tracking_code())
            .bind(&input.shipping_name)
            .bind(&input.shipping_phone)
            .bind(&input.shipping_address)
            .bind(&input.note)
            .bind(total)
            .fetch_one(&mut *tx)
            .await?;

        let item_query = format!(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ITEM_COLUMNS}"
        );
        let gift_query = format!(
            "INSERT INTO order_gift_items (order_item_id, product_id, quantity)
             VALUES ($1, $2, $3)
             RETURNING {GIFT_COLUMNS}"
        );
        let mut items = Vec::with_capacity(input.items.len());
        for (line, (unit, subtotal)) in input.items.iter().zip(lines) {
            let item = sqlx::query_as::<_, OrderItem>(&item_query)
                .bind(order.id)
                .bind(line.product_id)
                .bind(line.quantity)
                .bind(unit)
                .bind(subtotal)
                .fetch_one(&mut *tx)
                .await?;

            let mut gifts = Vec::with_capacity(line.gifts.len());
            for gift in &line.gifts {
                let row = sqlx::query_as::<_, OrderGiftItem>(&gift_query)
                    .bind(item.id)
                    .bind(gift.product_id)
                    .bind(gift.quantity)
                    .fetch_one(&mut *tx)
                    .await?;
                gifts.push(row);
            }

            let decremented: Option<(i32,)> = sqlx::query_as(
                "UPDATE products SET stock = stock - $2
                 WHERE id = $1 AND stock >= $2
                 RETURNING stock",
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .fetch_optional(&mut *tx)
            .await?;
            if decremented.is_none() {
                let (available,): (i32,) =
                    sqlx::query_as("SELECT stock FROM products WHERE id = $1")
                        .bind(line.product_id)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(OrderError::InsufficientStock {
                    product_id: line.product_id,
                    requested: line.quantity,
                    available,
                });
            }

            items.push(OrderItemDetail { item, gifts });
        }

        let payment_query = format!(
            "INSERT INTO payments (order_id, method)
             VALUES ($1, $2)
             RETURNING {PAYMENT_COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&payment_query)
            .bind(order.id)
            .bind(input.payment_method.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let ordered: Vec<DbId> = input.items.iter().map(|i| i.product_id).collect();
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = ANY($2)")
            .bind(user_id)
            .bind(&ordered)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(OrderDetail {
            order,
            items,
            payment: Some(payment),
        })
    }

    /// Change an order's status and/or payment state.
    ///
    /// Moving into `CANCELED` from any other status returns every item's
    /// quantity to stock in the same transaction. Leaving `CANCELED` does not
    /// take stock again. Returns `None` if the order does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrder,
    ) -> Result<Option<OrderUpdate>, OrderError> {
        let mut tx = pool.begin().await?;

        let Some((current,)): Option<(String,)> =
            sqlx::query_as("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(None);
        };
        let previous_status = parse_status(&current)?;

        let mut stock_restored = false;
        if let Some(next) = input.status {
            if restores_stock(previous_status, next) {
                sqlx::query(
                    "UPDATE products p SET stock = p.stock + oi.quantity
                     FROM (
                        SELECT product_id, SUM(quantity)::INTEGER AS quantity
                        FROM order_items WHERE order_id = $1
                        GROUP BY product_id
                     ) oi
                     WHERE p.id = oi.product_id",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
                stock_restored = true;
            }
            sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
                .bind(id)
                .bind(next.as_str())
                .execute(&mut *tx)
                .await?;
        }

        if input.payment_status.is_some() || input.is_paid.is_some() {
            sqlx::query(
                "UPDATE payments SET
                    status = COALESCE($2, status),
                    is_paid = COALESCE($3, is_paid)
                 WHERE order_id = $1",
            )
            .bind(id)
            .bind(input.payment_status.map(|s| s.as_str()))
            .bind(input.is_paid)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let order = Self::find_detail(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(Some(OrderUpdate {
            previous_status,
            order,
            stock_restored,
        }))
    }

    /// Delete an order with its gift items, items and payment.
    ///
    /// Stock is not adjusted. Returns `true` if the order existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM order_gift_items
             WHERE order_item_id IN (SELECT id FROM order_items WHERE order_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM payments WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load an order with items, gift items and payment.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<OrderDetail>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(order) => Ok(Some(load_detail(pool, order).await?)),
            None => Ok(None),
        }
    }

    /// Public lookup by tracking code.
    pub async fn find_by_tracking_code(
        pool: &PgPool,
        tracking_code: uuid::Uuid,
    ) -> Result<Option<OrderDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE tracking_code = $1");
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(tracking_code)
            .fetch_optional(pool)
            .await?;
        match order {
            Some(order) => Ok(Some(load_detail(pool, order).await?)),
            None => Ok(None),
        }
    }

    /// A store's orders, newest first, optionally filtered by status.
    pub async fn list_by_store(
        pool: &PgPool,
        params: &OrderListParams,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE store_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(params.store_id)
            .bind(params.status.map(|s| s.as_str()))
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// A buyer's own orders, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        params: &MyOrderParams,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }
}

fn parse_status(raw: &str) -> Result<OrderStatus, sqlx::Error> {
    OrderStatus::parse(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

async fn load_detail(pool: &PgPool, order: Order) -> Result<OrderDetail, sqlx::Error> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id ASC"
    ))
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    let item_ids: Vec<DbId> = items.iter().map(|i| i.id).collect();
    let gifts = sqlx::query_as::<_, OrderGiftItem>(&format!(
        "SELECT {GIFT_COLUMNS} FROM order_gift_items
         WHERE order_item_id = ANY($1) ORDER BY id ASC"
    ))
    .bind(&item_ids)
    .fetch_all(pool)
    .await?;
    let mut gifts_by_item: HashMap<DbId, Vec<OrderGiftItem>> = HashMap::new();
    for gift in gifts {
        gifts_by_item.entry(gift.order_item_id).or_default().push(gift);
    }

    let payment = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = $1"
    ))
    .bind(order.id)
    .fetch_optional(pool)
    .await?;

    let items = items
        .into_iter()
        .map(|item| {
            let gifts = gifts_by_item.remove(&item.id).unwrap_or_default();
            OrderItemDetail { item, gifts }
        })
        .collect();

    Ok(OrderDetail {
        order,
        items,
        payment,
    })
}
